pub mod admin;
pub mod migrate;

/// Resolve the database URL the same way the API does.
pub(crate) fn database_url() -> Option<String> {
    dotenvy::dotenv().ok();
    std::env::var("GEARSHOP_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .ok()
}
