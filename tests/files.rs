use std::io::Write;

use configit::{AttributeOptions, ConfigError, Loader, Schema, TypeTag, YamlParser};
use tempfile::{NamedTempFile, TempDir};

fn loader() -> Loader {
    let mut builder = Schema::builder();
    builder.attribute("name", AttributeOptions::new().required(true)).unwrap();
    builder
        .attribute("port", AttributeOptions::new().of_type(TypeTag::INTEGER))
        .unwrap();
    Loader::new(builder.build()).with_parser(YamlParser)
}

#[test]
fn loads_yaml_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "name: svc").unwrap();
    writeln!(file, "port: 8080").unwrap();

    let config = loader().load_from_file(file.path()).unwrap();
    assert!(config.is_valid());
    assert_eq!(config.get_integer("port").unwrap(), 8080);
}

#[test]
fn missing_file_fails_before_parsing() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.yml");

    let err = loader().load_from_file(&path).unwrap_err();
    assert!(matches!(err, ConfigError::FileNotFound(ref p) if *p == path));
    assert_eq!(err.to_string(), format!("file {} does not exist", path.display()));
}

#[test]
fn directory_is_not_a_config_file() {
    let dir = TempDir::new().unwrap();
    let result = loader().load_from_file(dir.path());
    assert!(matches!(
        result,
        Err(ConfigError::ReadError { .. }) | Err(ConfigError::FileNotReadable { .. })
    ));
}

#[cfg(unix)]
#[test]
fn unreadable_file_fails_before_parsing() {
    use std::fs::{self, File, Permissions};
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("locked.yml");
    // Contents would fail to parse, so any parse attempt would show up as a YAML error.
    fs::write(&path, "name: [unclosed\n").unwrap();
    fs::set_permissions(&path, Permissions::from_mode(0o000)).unwrap();

    // Privileged users bypass permission bits.
    if File::open(&path).is_ok() {
        return;
    }

    let result = loader().load_from_file(&path);
    assert!(matches!(result, Err(ConfigError::FileNotReadable { .. })));
}
