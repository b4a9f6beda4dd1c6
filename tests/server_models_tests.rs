use base64::{engine::general_purpose::STANDARD, Engine};
use linguadoc::server::error::ValidationError;
use linguadoc::server::models::CreateJobRequest;
use linguadoc::utils::AppConfig;

fn request(data: String, filename: &str) -> CreateJobRequest {
    CreateJobRequest {
        data,
        filename: filename.to_string(),
        source_language: None,
        target_language: None,
        ocr_engine: None,
        translation_model: None,
    }
}

#[test]
fn test_valid_request_decodes() {
    let config = AppConfig::default();
    let req = request(STANDARD.encode(b"%PDF-1.7 test"), "scan.pdf");

    let bytes = req.validate_and_decode(&config).unwrap();
    assert_eq!(bytes, b"%PDF-1.7 test");
    assert_eq!(req.sanitized_filename(), "scan.pdf");
}

#[test]
fn test_invalid_base64_is_rejected() {
    let config = AppConfig::default();
    let req = request("not base64!!!".to_string(), "scan.pdf");

    assert!(matches!(
        req.validate_and_decode(&config),
        Err(ValidationError::InvalidBase64(_))
    ));
}

#[test]
fn test_oversized_payload_is_rejected() {
    let mut config = AppConfig::default();
    config.max_file_size = 8;
    let req = request(STANDARD.encode(vec![0u8; 64]), "scan.pdf");

    assert!(req.validate_and_decode(&config).is_err());
}

#[test]
fn test_filename_rules() {
    let config = AppConfig::default();
    let data = STANDARD.encode(b"x");

    for bad in ["", "noextension", "trailing.", ".hidden", "a/b.pdf"] {
        let req = request(data.clone(), bad);
        assert!(
            req.validate_and_decode(&config).is_err(),
            "filename {bad:?} should be rejected"
        );
    }

    let req = request(data, "valid name.pdf");
    assert!(req.validate_and_decode(&config).is_ok());
}

#[test]
fn test_job_options_fall_back_to_configured_defaults() {
    let config = AppConfig::default();
    let mut req = request(String::new(), "scan.pdf");

    let defaults = req.job_options(&config);
    assert_eq!(defaults.source_language, "ar");
    assert_eq!(defaults.target_language, "en");
    assert_eq!(defaults.ocr_engine, "tesseract");

    req.target_language = Some("fr".to_string());
    assert_eq!(req.job_options(&config).target_language, "fr");
}
