use linguadoc::utils::config::AppConfig;
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_parse_config_from_json() {
    let json = r#"{
        "max_file_size": 10485760,
        "host_url": "127.0.0.1:8080",
        "worker_count": 4,
        "job_timeout_minutes": 15,
        "source_language": "ar",
        "target_language": "en",
        "ocr_engine": "tesseract",
        "ocr_language": "ara",
        "translation_endpoint": "http://localhost:9000/translate",
        "translation_model": "nllb-200-distilled-600M",
        "translation_batch_size": 16
    }"#;

    let config: AppConfig = serde_json::from_str(json).unwrap();

    assert_eq!(config.max_file_size, 10485760);
    assert_eq!(&*config.host_url, "127.0.0.1:8080");
    assert_eq!(config.worker_count, 4);
    assert_eq!(config.job_timeout_minutes, 15);
    assert_eq!(
        config.translation_endpoint.as_deref(),
        Some("http://localhost:9000/translate")
    );
    assert_eq!(config.translation_batch_size, 16);
}

#[test]
fn test_load_config_from_file() {
    let mut temp_file = NamedTempFile::new().unwrap();
    let json = r#"{
        "max_file_size": 52428800,
        "host_url": "0.0.0.0:8000",
        "worker_count": 2,
        "job_timeout_minutes": 30,
        "source_language": "ar",
        "target_language": "en",
        "ocr_engine": "tesseract",
        "ocr_language": "ara",
        "translation_model": "nllb-200-3.3B",
        "translation_batch_size": 32
    }"#;
    temp_file.write_all(json.as_bytes()).unwrap();

    let config = AppConfig::from_file(temp_file.path()).unwrap();

    assert_eq!(config.max_file_size, 52428800);
    assert_eq!(&*config.host_url, "0.0.0.0:8000");
    assert!(config.translation_endpoint.is_none());
}

#[test]
fn test_default_config() {
    let config = AppConfig::default();

    assert_eq!(config.max_file_size, 50 * 1024 * 1024);
    assert_eq!(&*config.host_url, "0.0.0.0:8000");
    assert_eq!(config.worker_count, 2);
    assert_eq!(&*config.source_language, "ar");
    assert_eq!(&*config.target_language, "en");
    assert_eq!(&*config.ocr_engine, "tesseract");
    assert!(config.translation_endpoint.is_none());
}

#[test]
fn test_config_from_missing_file_fails() {
    assert!(AppConfig::from_file("nonexistent/config.json").is_err());
}
