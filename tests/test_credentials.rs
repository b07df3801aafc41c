use std::io::Write;

use navilink_bridge::config::Credentials;

#[test]
fn loads_the_vendor_credentials_format() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{"Username": "someone@example.com", "Password": "hunter2"}}"#).unwrap();

    let credentials = Credentials::new(file.path().to_str().unwrap()).unwrap();
    assert_eq!(credentials.username, "someone@example.com");
    assert_eq!(credentials.password, "hunter2");
}

#[test]
fn missing_fields_are_an_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{"Username": "someone@example.com"}}"#).unwrap();

    let result = Credentials::new(file.path().to_str().unwrap());
    assert!(result.is_err());
}

#[test]
fn missing_file_is_an_error() {
    assert!(Credentials::new("/nonexistent/credentials.json").is_err());
}
