use crate::domain::model::{Record, Table, REQUIRED_COLUMNS};
use crate::utils::error::{EtlError, Result};
use std::collections::HashMap;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// 解析分隔文字表：去除 BOM、跳過空行、第一列為表頭
pub fn parse_table(bytes: &[u8], delimiter: u8) -> Result<Table> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let text = std::str::from_utf8(bytes).map_err(|e| EtlError::EncodingError {
        message: format!("invalid byte sequence at offset {}", e.valid_up_to()),
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let raw_headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let columns = normalize_headers(&raw_headers);
    tracing::debug!("Columns found: {:?}", columns);

    for required in REQUIRED_COLUMNS {
        if !columns.iter().any(|c| c == required) {
            return Err(EtlError::MissingColumnError {
                column: required.to_string(),
            });
        }
    }

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        // 只含空白字元的行視為空行
        if row.len() == 1 && row[0].trim().is_empty() {
            continue;
        }
        if row.len() > columns.len() {
            return Err(EtlError::MalformedRowError {
                line: row.position().map(|p| p.line()).unwrap_or(0),
                expected: columns.len(),
                found: row.len(),
            });
        }

        // 欄位不足的列以空字串補齊
        let record: Record = columns
            .iter()
            .enumerate()
            .map(|(i, column)| (column.as_str(), row.get(i).unwrap_or("")))
            .collect();
        records.push(record);
    }

    Ok(Table { columns, records })
}

/// Names blank header cells `Unnamed: {index}` and suffixes repeated
/// names with `.1`, `.2`, ... so every column has a distinct key.
pub fn normalize_headers(raw: &[String]) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut columns: Vec<String> = Vec::with_capacity(raw.len());

    for (index, name) in raw.iter().enumerate() {
        let base = if name.trim().is_empty() {
            format!("Unnamed: {}", index)
        } else {
            name.clone()
        };

        let mut candidate = base.clone();
        while columns.contains(&candidate) {
            let counter = seen.entry(base.clone()).or_insert(0);
            *counter += 1;
            candidate = format!("{}.{}", base, counter);
        }
        columns.push(candidate);
    }

    columns
}

/// Writes records with the given column order, BOM first, one line per record.
pub fn write_table(columns: &[String], records: &[Record], delimiter: u8) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .terminator(csv::Terminator::Any(b'\n'))
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(UTF8_BOM.to_vec());

    writer.write_record(columns)?;
    for record in records {
        writer.write_record(columns.iter().map(|column| record.get(column)))?;
    }

    writer
        .into_inner()
        .map_err(|e| EtlError::IoError(e.into_error()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_bom_and_blank_lines() {
        let input = "\u{feff}dni;email;telefono;nombre\n12345678Z;a@b.com;600111222;Ana\n\n00000000T;;;Luis\n";
        let table = parse_table(input.as_bytes(), b';').unwrap();

        assert_eq!(table.columns, vec!["dni", "email", "telefono", "nombre"]);
        assert_eq!(table.records.len(), 2);
        assert_eq!(table.records[0].get("nombre"), "Ana");
        assert_eq!(table.records[1].get("email"), "");
        assert_eq!(table.records[1].get("nombre"), "Luis");
    }

    #[test]
    fn test_parse_skips_whitespace_only_lines() {
        let input = "dni;email;telefono\n12345678Z;a@b.com;600111222\n   \n\t\n";
        let table = parse_table(input.as_bytes(), b';').unwrap();

        assert_eq!(table.records.len(), 1);
        assert_eq!(table.records[0].get("dni"), "12345678Z");
    }

    #[test]
    fn test_parse_pads_short_rows() {
        let input = "dni;email;telefono;nombre\n12345678Z;a@b.com\n";
        let table = parse_table(input.as_bytes(), b';').unwrap();
        assert_eq!(table.records[0].get("telefono"), "");
        assert!(table.records[0].contains("nombre"));
    }

    #[test]
    fn test_parse_rejects_long_rows() {
        let input = "dni;email;telefono\n12345678Z;a@b.com;600111222;extra\n";
        let err = parse_table(input.as_bytes(), b';').unwrap_err();
        assert!(matches!(
            err,
            EtlError::MalformedRowError {
                expected: 3,
                found: 4,
                ..
            }
        ));
    }

    #[test]
    fn test_parse_missing_required_column() {
        let input = "dni;correo;telefono\n12345678Z;a@b.com;600111222\n";
        let err = parse_table(input.as_bytes(), b';').unwrap_err();
        match err {
            EtlError::MissingColumnError { column } => assert_eq!(column, "email"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_wrong_delimiter_is_missing_column() {
        let input = "dni,email,telefono\n12345678Z,a@b.com,600111222\n";
        assert!(matches!(
            parse_table(input.as_bytes(), b';'),
            Err(EtlError::MissingColumnError { .. })
        ));
    }

    #[test]
    fn test_parse_rejects_invalid_utf8() {
        let mut input = b"dni;email;telefono\n".to_vec();
        input.extend_from_slice(&[0x31, 0xFF, 0xFE, b';', b';', b'\n']);
        assert!(matches!(
            parse_table(&input, b';'),
            Err(EtlError::EncodingError { .. })
        ));
    }

    #[test]
    fn test_normalize_headers() {
        let raw: Vec<String> = ["dni", "", "email", "dni", "dni", " "]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(
            normalize_headers(&raw),
            vec!["dni", "Unnamed: 1", "email", "dni.1", "dni.2", "Unnamed: 5"]
        );
    }

    #[test]
    fn test_write_table_with_bom_and_missing_fields() {
        let columns = vec!["dni".to_string(), "email".to_string(), "nota".to_string()];
        let records: Vec<Record> = vec![
            [("dni", "12345678Z"), ("email", "a@b.com")].into_iter().collect(),
            [("dni", "X1234567L"), ("nota", "con; punto y coma")]
                .into_iter()
                .collect(),
        ];

        let bytes = write_table(&columns, &records, b';').unwrap();
        assert!(bytes.starts_with(UTF8_BOM));

        let text = std::str::from_utf8(&bytes[UTF8_BOM.len()..]).unwrap();
        assert_eq!(
            text,
            "dni;email;nota\n12345678Z;a@b.com;\nX1234567L;;\"con; punto y coma\"\n"
        );
    }

    #[test]
    fn test_written_table_parses_back() {
        let columns: Vec<String> = ["dni", "email", "telefono"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let records: Vec<Record> = vec![[
            ("dni", "12345678Z"),
            ("email", "a@b.com"),
            ("telefono", "600111222"),
        ]
        .into_iter()
        .collect()];

        let bytes = write_table(&columns, &records, b';').unwrap();
        let table = parse_table(&bytes, b';').unwrap();
        assert_eq!(table.columns, columns);
        assert_eq!(table.records, records);
    }
}
