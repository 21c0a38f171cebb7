mod cli;
mod infra;
mod score;

use repo_scorer::error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}
