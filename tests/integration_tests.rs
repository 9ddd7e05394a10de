use anyhow::Result;
use padron_etl::config::toml_config::TomlConfig;
use padron_etl::{CliConfig, CsvPipeline, EtlEngine, EtlError, LocalStorage};
use std::path::Path;
use tempfile::TempDir;

const USERS_CSV: &str = "\u{feff}dni;email;telefono;nombre;;\n\
12345678Z;A@B.COM;600111222;Ana;;\n\
00000000X;bad;;Luis;;\n\
\n\
X1234567L;;910111222 / 700111222;Marta;;\n\
B12345674;Empresa@Ejemplo.ES;tel. 911 222 333;Acme SL;;\n";

fn cli_config(input: &Path, output: &Path) -> CliConfig {
    CliConfig {
        input: input.to_str().unwrap().to_string(),
        output_path: output.to_str().unwrap().to_string(),
        delimiter: ";".to_string(),
        run_id: None,
        no_timestamp: true,
        bundle: None,
        summary_json: false,
        log_json: false,
        verbose: false,
        monitor: false,
    }
}

fn read_output(dir: &Path, name: &str) -> String {
    let bytes = std::fs::read(dir.join(name)).unwrap();
    assert!(bytes.starts_with(b"\xEF\xBB\xBF"), "{} should start with a BOM", name);
    String::from_utf8(bytes[3..].to_vec()).unwrap()
}

#[tokio::test]
async fn test_end_to_end_validation_run() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let input = temp_dir.path().join("usuarios.csv");
    let output = temp_dir.path().join("output");
    std::fs::write(&input, USERS_CSV)?;

    let config = cli_config(&input, &output);
    let storage = LocalStorage::new(config.output_path.clone());
    let engine = EtlEngine::new(CsvPipeline::new(storage, config));

    let summary = engine.run().await?;

    assert_eq!(summary.total_records, 4);
    assert_eq!(summary.valid_records, 3);
    assert_eq!(summary.invalid_records, 1);
    assert_eq!(summary.warning_records, 1);
    assert_eq!(
        summary.columns,
        vec!["dni", "email", "telefono", "nombre", "Unnamed: 4", "Unnamed: 5"]
    );

    let valid = read_output(&output, "usuarios_validos.csv");
    assert_eq!(
        valid,
        "dni;email;telefono;nombre;old_user\n\
12345678Z;a@b.com;600111222;Ana;1\n\
X1234567L;;700111222;Marta;1\n\
B12345674;Empresa@ejemplo.es;;Acme SL;1\n"
    );

    let invalid = read_output(&output, "usuarios_invalidos.csv");
    assert!(invalid.starts_with("dni;email;telefono;nombre;old_user;motivo_invalido\n"));
    assert!(invalid.contains("00000000X;;;Luis;1;\"DNI: incorrect control letter (expected: T); Email: "));

    let warnings = read_output(&output, "usuarios_advertencias.csv");
    assert_eq!(
        warnings,
        "dni;email;telefono;nombre;old_user;email_original;motivo_warning\n\
X1234567L;;700111222;Marta;1;;Email: empty email\n"
    );

    Ok(())
}

#[tokio::test]
async fn test_only_non_empty_outputs_are_written() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let input = temp_dir.path().join("usuarios.csv");
    let output = temp_dir.path().join("output");
    std::fs::write(&input, "dni;email;telefono\n12345678Z;ana@example.com;600111222\n")?;

    let config = cli_config(&input, &output);
    let storage = LocalStorage::new(config.output_path.clone());
    let summary = EtlEngine::new(CsvPipeline::new(storage, config)).run().await?;

    assert_eq!(summary.valid_file.as_deref(), Some("usuarios_validos.csv"));
    assert!(summary.invalid_file.is_none());
    assert!(summary.warning_file.is_none());
    assert!(output.join("usuarios_validos.csv").exists());
    assert!(!output.join("usuarios_invalidos.csv").exists());
    assert!(!output.join("usuarios_advertencias.csv").exists());
    Ok(())
}

#[tokio::test]
async fn test_missing_column_fails_without_output() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let input = temp_dir.path().join("usuarios.csv");
    let output = temp_dir.path().join("output");
    std::fs::write(&input, "dni;correo;telefono\n12345678Z;ana@example.com;600111222\n")?;

    let config = cli_config(&input, &output);
    let storage = LocalStorage::new(config.output_path.clone());
    let result = EtlEngine::new(CsvPipeline::new(storage, config)).run().await;

    match result {
        Err(EtlError::MissingColumnError { column }) => assert_eq!(column, "email"),
        other => panic!("expected missing column error, got {:?}", other),
    }
    assert!(!output.exists());
    Ok(())
}

#[tokio::test]
async fn test_malformed_row_fails_whole_batch() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let input = temp_dir.path().join("usuarios.csv");
    let output = temp_dir.path().join("output");
    std::fs::write(
        &input,
        "dni;email;telefono\n12345678Z;a@b.com;600111222\n00000000T;c@d.com;600111222;extra\n",
    )?;

    let config = cli_config(&input, &output);
    let storage = LocalStorage::new(config.output_path.clone());
    let result = EtlEngine::new(CsvPipeline::new(storage, config)).run().await;

    assert!(matches!(result, Err(EtlError::MalformedRowError { .. })));
    assert!(!output.exists());
    Ok(())
}

#[tokio::test]
async fn test_timestamped_names_with_run_id() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let input = temp_dir.path().join("usuarios.csv");
    let output = temp_dir.path().join("output");
    std::fs::write(&input, USERS_CSV)?;

    let mut config = cli_config(&input, &output);
    config.no_timestamp = false;
    config.run_id = Some("upload42".to_string());
    config.summary_json = true;
    config.bundle = Some("resultados.zip".to_string());

    let storage = LocalStorage::new(config.output_path.clone());
    let summary = EtlEngine::new(CsvPipeline::new(storage, config)).run().await?;

    let valid_file = summary.valid_file.clone().unwrap();
    assert!(valid_file.starts_with("upload42_usuarios_validos_"));
    assert!(valid_file.ends_with(".csv"));
    // upload42_usuarios_validos_YYYYMMDD_HHMMSS.csv
    assert_eq!(valid_file.len(), "upload42_usuarios_validos_".len() + 15 + 4);
    assert!(output.join(&valid_file).exists());

    let json_files: Vec<String> = std::fs::read_dir(&output)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().to_string())
        .filter(|name| name.starts_with("upload42_resumen_") && name.ends_with(".json"))
        .collect();
    assert_eq!(json_files.len(), 1);

    let summary_json = std::fs::read_to_string(output.join(&json_files[0]))?;
    let parsed: serde_json::Value = serde_json::from_str(&summary_json)?;
    assert_eq!(parsed["total_records"], 4);
    assert_eq!(parsed["warning_reasons"]["Email: empty email"], 1);

    let zip_data = std::fs::read(output.join("resultados.zip"))?;
    let archive = zip::ZipArchive::new(std::io::Cursor::new(zip_data))?;
    assert_eq!(archive.len(), 4);
    Ok(())
}

#[tokio::test]
async fn test_toml_configured_run() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let base = temp_dir.path().to_str().unwrap().replace('\\', "/");
    std::fs::write(
        temp_dir.path().join("usuarios.csv"),
        "dni|email|telefono\n12345678Z|a@b.com|600111222\nbad|x@y.com|\n",
    )?;

    let config = TomlConfig::from_toml_str(&format!(
        r#"
[job]
name = "pipe-delimited"

[input]
path = "{base}/usuarios.csv"
delimiter = "|"

[output]
path = "{base}/out"
timestamped = false
"#
    ))?;

    let storage = LocalStorage::new(format!("{}/out", base));
    let summary = EtlEngine::new(CsvPipeline::new(storage, config)).run().await?;

    assert_eq!(summary.valid_records, 1);
    assert_eq!(summary.invalid_records, 1);
    assert_eq!(summary.invalid_reasons.get("DNI: invalid format"), 1);

    let invalid = read_output(&temp_dir.path().join("out"), "usuarios_invalidos.csv");
    assert_eq!(
        invalid,
        "dni|email|telefono|old_user|motivo_invalido\nbad|x@y.com||1|DNI: invalid format\n"
    );
    Ok(())
}
