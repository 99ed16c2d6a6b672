use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug)]
pub struct Settings {
    pub collection_name: String,
    pub wrong_option_count: usize,
    pub synthesis_output: PathBuf,
    pub request_timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            collection_name: "questions".to_owned(),
            wrong_option_count: 3,
            synthesis_output: PathBuf::from("quiz_with_options.csv"),
            request_timeout: Duration::from_secs(30),
        }
    }
}
