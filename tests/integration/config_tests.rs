//! Configuration files driving a run

use news_sweep::config::load_config_with_hash;
use news_sweep::crawler::SearchSettings;
use news_sweep::search::{DateWindow, SearchQuery};
use std::io::Write;
use tempfile::NamedTempFile;

const SWEEP_TOML: &str = r#"
[search]
required-keywords = ["fortaleza", "alagamento"]
optional-keywords = ["chuva"]
max-pages = 5

[content]
keywords = ["rua geraldo barbosa", "avenida"]

[dates]
from = "2021-12-30"
to = "2022-01-02"

[fetcher]
concurrency = 8
"#;

#[test]
fn test_config_file_to_first_query() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(SWEEP_TOML.as_bytes()).unwrap();

    let (config, hash) = load_config_with_hash(file.path()).unwrap();
    assert_eq!(hash.len(), 64);

    let settings = SearchSettings::from_config(&config);
    assert_eq!(settings.max_pages, 5);
    assert_eq!(settings.max_attempts, 3);
    assert_eq!(settings.concurrency, 8);

    let window = DateWindow::new(config.dates.from, config.dates.to).unwrap();
    assert_eq!(window.len_days(), 4);

    let first = window.days().next().unwrap();
    let query = SearchQuery::new(
        settings.required_keywords.clone(),
        settings.optional_keywords.clone(),
        DateWindow::single_day(first),
    );
    assert_eq!(
        query.to_url(&config.search.base_url),
        "https://www.google.com/search?q=%22fortaleza%22+%22alagamento%22+chuva\
         &tbs=cdr:1,cd_min:12/30/2021,cd_max:12/30/2021"
    );
}

#[test]
fn test_config_hash_changes_with_content() {
    let mut first = NamedTempFile::new().unwrap();
    first.write_all(SWEEP_TOML.as_bytes()).unwrap();

    let mut second = NamedTempFile::new().unwrap();
    second
        .write_all(SWEEP_TOML.replace("max-pages = 5", "max-pages = 4").as_bytes())
        .unwrap();

    let (_, a) = load_config_with_hash(first.path()).unwrap();
    let (_, b) = load_config_with_hash(second.path()).unwrap();
    assert_ne!(a, b);
}
