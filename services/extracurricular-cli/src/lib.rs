mod cli;
mod render;

use extracurricular::error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}
