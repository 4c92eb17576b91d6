use log::error;

use csv_row_index::error::{EXIT_USER_ERROR, exit_code};

fn main() {
    if let Err(err) = csv_row_index::run() {
        let code = exit_code(&err);
        if code == EXIT_USER_ERROR {
            error!("{err:#}");
        } else {
            error!("{err:?}");
        }
        std::process::exit(code);
    }
}
