// ============================================================================
// MODELS - MODULE PRINCIPAL
// ============================================================================
//
// Description:
//   Point d'entrée pour tous les modèles de données.
//   Chaque modèle correspond à une table PostgreSQL avec SeaORM.
//
// Liste des modules:
//   - health : Health check API
//   - dto : Data Transfer Objects pour les requêtes/réponses API
//   - users : Utilisateurs (identité, flags is_verified/is_active/is_admin)
//   - profiles : Profils (one-to-one avec users, créé vide à l'inscription)
//   - one_time_passwords : Codes OTP de vérification de compte (expire 2 min)
//   - token_blacklist : Refresh tokens révoqués (par jti)
//   - tasks : Tâches par utilisateur (lookup par slug)
//
// Points d'attention:
//   - Tous les modèles utilisent SeaORM (pas de SQL brut)
//   - Les relations entre tables sont définies dans chaque modèle
//
// ============================================================================

pub mod health;
pub mod dto;
pub mod users;
pub mod profiles;
pub mod one_time_passwords;
pub mod token_blacklist;
pub mod tasks;
