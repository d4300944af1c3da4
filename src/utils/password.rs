use hmac::Hmac;
use pbkdf2::pbkdf2;
use sha2::Sha256;
use rand::Rng;
use rand::distributions::Alphanumeric;
use base64::{Engine, engine::general_purpose::STANDARD};

type HmacSha256 = Hmac<Sha256>;

const ALGORITHM: &str = "pbkdf2_sha256";
const ITERATIONS: u32 = 600000;
const SALT_LENGTH: usize = 22;
const KEY_LENGTH: usize = 32;

/// Hash un mot de passe au format Django
/// Utilise PBKDF2-HMAC-SHA256 avec 600000 itérations et un salt
/// alphanumérique de 22 caractères
pub fn hash_password(password: &str) -> Result<String, String> {
    hash_with_iterations(password, ITERATIONS)
}

fn hash_with_iterations(password: &str, iterations: u32) -> Result<String, String> {
    // Générer un salt alphanumérique aléatoire
    let salt: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SALT_LENGTH)
        .map(char::from)
        .collect();

    // Calculer le hash PBKDF2
    let mut key = [0u8; KEY_LENGTH];
    pbkdf2::<HmacSha256>(password.as_bytes(), salt.as_bytes(), iterations, &mut key)
        .map_err(|e| format!("PBKDF2 hash generation failed: {}", e))?;

    let hash_b64 = STANDARD.encode(key);

    // Format: pbkdf2_sha256$iterations$salt$hash
    Ok(format!("{}${}${}${}", ALGORITHM, iterations, salt, hash_b64))
}

// Le nombre d'itérations est encodé dans le hash, donc les tests peuvent
// hasher avec un compte réduit et verify_password reste honnête
#[cfg(test)]
pub(crate) fn hash_password_fast(password: &str) -> Result<String, String> {
    hash_with_iterations(password, 1000)
}

/// Vérifie un mot de passe contre un hash au format Django
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool, String> {
    // Parser le format: pbkdf2_sha256$iterations$salt$hash
    let parts: Vec<&str> = stored_hash.split('$').collect();
    if parts.len() != 4 {
        return Err("Invalid hash format".to_string());
    }

    if parts[0] != ALGORITHM {
        return Err(format!("Unsupported algorithm: {}", parts[0]));
    }

    let iterations = parts[1]
        .parse::<u32>()
        .map_err(|_| "Invalid iterations".to_string())?;

    let salt = parts[2];

    let expected_hash = STANDARD
        .decode(parts[3])
        .map_err(|e| format!("Base64 decode failed: {}", e))?;

    // Calculer le hash avec le même salt et iterations
    let mut computed = vec![0u8; expected_hash.len()];
    pbkdf2::<HmacSha256>(password.as_bytes(), salt.as_bytes(), iterations, &mut computed)
        .map_err(|e| format!("PBKDF2 hash verification failed: {}", e))?;

    // Comparaison à temps constant
    let mut diff = computed.len() ^ expected_hash.len();
    for (a, b) in computed.iter().zip(expected_hash.iter()) {
        diff |= (a ^ b) as usize;
    }
    Ok(diff == 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password_fast("Secret12345").unwrap();
        assert!(verify_password("Secret12345", &hash).unwrap());
    }

    #[test]
    fn test_wrong_password_rejected() {
        let hash = hash_password_fast("Secret12345").unwrap();
        assert!(!verify_password("NotTheSame1", &hash).unwrap());
    }

    #[test]
    fn test_hash_format_uses_production_iterations() {
        let hash = hash_password("Secret12345").unwrap();
        let parts: Vec<&str> = hash.split('$').collect();
        assert_eq!(parts.len(), 4);
        assert_eq!(parts[0], "pbkdf2_sha256");
        assert_eq!(parts[1], "600000");
        assert_eq!(parts[2].len(), 22);
        assert!(verify_password("Secret12345", &hash).unwrap());
    }

    #[test]
    fn test_salts_differ_between_hashes() {
        let first = hash_password_fast("Secret12345").unwrap();
        let second = hash_password_fast("Secret12345").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_malformed_hash_is_error() {
        assert!(verify_password("whatever", "not-a-hash").is_err());
        assert!(verify_password("whatever", "md5$1$salt$hash").is_err());
    }
}
