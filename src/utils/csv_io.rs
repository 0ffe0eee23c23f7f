//! 奖项 / 参与者 CSV 导入与抽奖结果导出

use crate::error::{AppError, AppResult};
use crate::models::DrawResult;
use csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};

const UTF8_BOM: &[u8] = b"\xef\xbb\xbf";

/// 导出文件表头：奖项名称, 员工编号, 员工姓名, 奖品名称
pub const RESULTS_CSV_HEADER: [&str; 4] = ["獎項名稱", "員工編號", "員工姓名", "獎品名稱"];

/// 一行奖项数据: `name,item,quantity,drawFromAll`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrizeRow {
    pub name: String,
    pub item: String,
    pub quantity: u32,
    pub draw_from_all: bool,
}

/// 一行参与者数据: `id,name`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantRow {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCsv<T> {
    pub rows: Vec<T>,
    pub skipped: usize,
}

fn reader(input: &[u8]) -> csv::Reader<&[u8]> {
    // Excel 导出的 CSV 常带 BOM
    let input = input.strip_prefix(UTF8_BOM).unwrap_or(input);
    ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(input)
}

/// 逐行解析，字段数不符的行记录警告后跳过
fn parse_rows<T>(
    input: &[u8],
    fields: usize,
    kind: &str,
    mut map: impl FnMut(&StringRecord) -> T,
) -> Result<ParsedCsv<T>, csv::Error> {
    let mut rows = Vec::new();
    let mut skipped = 0;
    for record in reader(input).records() {
        let record = record?;
        if record.len() != fields {
            log::warn!("Skipping malformed {kind} CSV record: {record:?}");
            skipped += 1;
            continue;
        }
        rows.push(map(&record));
    }
    Ok(ParsedCsv { rows, skipped })
}

pub fn parse_prizes(input: &[u8]) -> Result<ParsedCsv<PrizeRow>, csv::Error> {
    parse_rows(input, 4, "prize", |record| PrizeRow {
        name: record[0].to_string(),
        item: record[1].to_string(),
        // 无法解析的数量视为 0
        quantity: record[2].parse().unwrap_or(0),
        draw_from_all: parse_bool(&record[3]).unwrap_or(false),
    })
}

pub fn parse_participants(input: &[u8]) -> Result<ParsedCsv<ParticipantRow>, csv::Error> {
    parse_rows(input, 2, "participant", |record| ParticipantRow {
        id: record[0].to_string(),
        name: record[1].to_string(),
    })
}

/// 与 Go `strconv.ParseBool` 相同的字面值
pub fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

/// 抽奖结果导出为带 BOM 的 UTF-8 CSV（Excel 可直接打开）
pub fn export_results(results: &[DrawResult]) -> AppResult<Vec<u8>> {
    let mut writer = WriterBuilder::new().from_writer(UTF8_BOM.to_vec());
    writer.write_record(RESULTS_CSV_HEADER)?;
    for result in results {
        writer.write_record([
            result.prize_name.as_str(),
            result.winner_id.as_str(),
            result.winner_name.as_str(),
            result.prize_item.as_str(),
        ])?;
    }
    writer
        .into_inner()
        .map_err(|e| AppError::InternalError(format!("Error flushing CSV writer: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_parse_prizes() {
        let input = "Grand,TV,1,false\nSpecial, Phone ,2,TRUE\nbroken,row\nOdd,Pen,abc,maybe\n";
        let parsed = parse_prizes(input.as_bytes()).unwrap();

        assert_eq!(parsed.skipped, 1);
        assert_eq!(
            parsed.rows,
            vec![
                PrizeRow {
                    name: "Grand".into(),
                    item: "TV".into(),
                    quantity: 1,
                    draw_from_all: false,
                },
                PrizeRow {
                    name: "Special".into(),
                    item: "Phone".into(),
                    quantity: 2,
                    draw_from_all: true,
                },
                PrizeRow {
                    name: "Odd".into(),
                    item: "Pen".into(),
                    quantity: 0,
                    draw_from_all: false,
                },
            ]
        );
    }

    #[test]
    fn test_negative_quantity_becomes_zero() {
        let parsed = parse_prizes("Grand,TV,-3,t".as_bytes()).unwrap();
        assert_eq!(parsed.rows[0].quantity, 0);
        assert!(parsed.rows[0].draw_from_all);
    }

    #[test]
    fn test_parse_participants_with_bom() {
        let mut input = UTF8_BOM.to_vec();
        input.extend_from_slice("001,Alice\n002,Bob,extra\n003,\"Chen, Charlie\"\n".as_bytes());
        let parsed = parse_participants(input.as_slice()).unwrap();

        assert_eq!(parsed.skipped, 1);
        assert_eq!(parsed.rows.len(), 2);
        assert_eq!(parsed.rows[0].id, "001");
        assert_eq!(parsed.rows[1].name, "Chen, Charlie");
    }

    #[test]
    fn test_short_input_without_bom() {
        let parsed = parse_participants("1,A".as_bytes()).unwrap();
        assert_eq!(
            parsed.rows,
            vec![ParticipantRow {
                id: "1".into(),
                name: "A".into()
            }]
        );
    }

    #[test]
    fn test_invalid_utf8_fails() {
        let input: &[u8] = b"001,\xff\xfe\n";
        assert!(parse_participants(input).is_err());
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("True"), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("yes"), None);
    }

    #[test]
    fn test_export_results() {
        let results = vec![DrawResult {
            prize_name: "大獎".into(),
            prize_item: "電視".into(),
            winner_id: "001".into(),
            winner_name: "Alice".into(),
            drawn_at: Utc::now(),
        }];
        let bytes = export_results(&results).unwrap();

        assert!(bytes.starts_with(UTF8_BOM));
        let text = String::from_utf8(bytes[UTF8_BOM.len()..].to_vec()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "獎項名稱,員工編號,員工姓名,獎品名稱");
        assert_eq!(lines[1], "大獎,001,Alice,電視");
    }
}
