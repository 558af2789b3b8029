use crate::domain::Program;
use crate::errors::ServerError;
use crate::exports::{export_row, COLUMNS};
use csv::{QuoteStyle, Terminator, WriterBuilder};

/// Renders programs as CSV. Every field is quoted and embedded quotes are doubled.
pub fn programs_to_csv<P: AsRef<Program>>(programs: &[P]) -> Result<String, ServerError> {
    let mut wtr = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::CRLF)
        .from_writer(Vec::new());

    wtr.write_record(COLUMNS)
        .map_err(|e| ServerError::ExportError(format!("Failed to write CSV header: {e}")))?;

    for program in programs {
        let program = program.as_ref();
        wtr.write_record(export_row(program)).map_err(|e| {
            ServerError::ExportError(format!(
                "Failed to write CSV row for '{}': {e}",
                program.program_name
            ))
        })?;
    }

    let bytes = wtr
        .into_inner()
        .map_err(|e| ServerError::ExportError(format!("Failed to flush CSV: {e}")))?;
    String::from_utf8(bytes).map_err(|e| ServerError::ExportError(format!("CSV is not UTF-8: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CostCategory, ProgramId};

    fn sample() -> Vec<Program> {
        let mut a = Program::new(ProgramId::Int(1), "The \"Best\" Camp");
        a.description = Some("Line one, with comma".into());
        a.cost_category = Some(CostCategory::Free);
        a.housing_provided = Some(true);
        let b = Program::new(ProgramId::Int(2), "Plain");
        vec![a, b]
    }

    #[test]
    fn header_plus_one_row_per_program() {
        let out = programs_to_csv(&sample()).unwrap();
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(out.as_bytes());
        let records: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();

        assert_eq!(records.len(), 3);
        assert_eq!(&records[0][0], "Program Name");
        assert_eq!(&records[1][0], "The \"Best\" Camp");
        assert_eq!(&records[1][6], "FREE");
        assert_eq!(&records[1][14], "Yes");
        assert_eq!(&records[2][3], "N/A");
        assert_eq!(&records[2][2], "Various, Multiple States");
    }

    #[test]
    fn every_field_is_quoted_and_quotes_doubled() {
        let out = programs_to_csv(&sample()).unwrap();
        assert!(out.starts_with("\"Program Name\",\"Organization\","));
        assert!(out.contains("\"The \"\"Best\"\" Camp\""));
        assert!(out.contains("\"Line one, with comma\""));
    }

    #[test]
    fn empty_list_is_header_only() {
        let out = programs_to_csv::<Program>(&[]).unwrap();
        assert_eq!(out.lines().count(), 1);
    }
}
