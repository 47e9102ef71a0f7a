//! Common test utilities for integration tests

use std::fs;
use std::io::Write;
use std::path::Path;

/// Helper function to create a test XML file in a directory
#[allow(dead_code)]
pub fn create_test_xml_file(path: &Path, content: &str) {
    let parent = path.parent().unwrap();
    fs::create_dir_all(parent).unwrap();
    fs::File::create(path)
        .unwrap()
        .write_all(content.as_bytes())
        .unwrap();
}

/// Helper function to create an xz-compressed export
#[allow(dead_code)]
pub fn create_test_xz_file(path: &Path, content: &str) {
    use xz2::write::XzEncoder;

    let mut encoder = XzEncoder::new(Vec::new(), 6);
    encoder.write_all(content.as_bytes()).unwrap();
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, encoder.finish().unwrap()).unwrap();
}

/// Helper function to create a gzip-compressed export
#[allow(dead_code)]
pub fn create_test_gz_file(path: &Path, content: &str) {
    use flate2::write::GzEncoder;
    use flate2::Compression;

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(content.as_bytes()).unwrap();
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, encoder.finish().unwrap()).unwrap();
}

/// SMS export holding one message, as written by SMS Backup & Restore
#[allow(dead_code)]
pub const SHARED_SMS_EXPORT: &str = r#"<?xml version='1.0' encoding='UTF-8' standalone='yes' ?>
<smses count="1">
  <sms protocol="0" address="+34600000001" date="1547326061000" type="1" body="Dinner at 8?" read="1" readable_date="2019-01-12 20:47:41" contact_name="Ana" />
</smses>"#;

/// SMS export holding the shared message plus an earlier one
#[allow(dead_code)]
pub const SMS_EXPORT_WITH_EARLIER: &str = r#"<?xml version='1.0' encoding='UTF-8' standalone='yes' ?>
<smses count="2">
  <sms protocol="0" address="+34600000001" date="1547326061000" type="1" body="Dinner at 8?" read="1" readable_date="2019-01-12 20:47:41" contact_name="Ana" />
  <sms protocol="0" address="+34600000002" date="1547200000000" type="2" body="Morning!" read="1" readable_date="2019-01-11 09:46:40" contact_name="Luis" />
</smses>"#;

/// Call-log export with one call
#[allow(dead_code)]
pub const CALLS_EXPORT: &str = r#"<?xml version='1.0' encoding='UTF-8' standalone='yes' ?>
<calls count="1">
  <call number="+34600000003" duration="62" date="1547290000000" type="2" readable_date="2019-01-12 10:46:40" contact_name="Eva" />
</calls>"#;

/// Export whose only record carries a date nobody can parse
#[allow(dead_code)]
pub const UNPARSEABLE_DATE_EXPORT: &str = r#"<smses count="1">
  <sms address="+1" body="?" readable_date="the day after the party" />
</smses>"#;

/// Malformed export (mismatched tags)
#[allow(dead_code)]
pub const MALFORMED_EXPORT: &str = r#"<smses count="1">
  <sms address="+1" readable_date="2019-01-12 20:47:41">
</smses>"#;
