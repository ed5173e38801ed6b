mod cli;
mod commands;
mod infra;
mod routes;
mod server;

use tenant_docs::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
