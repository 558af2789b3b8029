use crate::domain::Program;
use crate::errors::ServerError;
use crate::exports::{export_row, COLUMNS};
use rust_xlsxwriter::{Format, Workbook};

const DURATION_COL: u16 = 5;

/// Same columns as the CSV export, one worksheet, bold header row.
pub fn programs_to_xlsx<P: AsRef<Program>>(programs: &[P]) -> Result<Vec<u8>, ServerError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name("Programs")
        .map_err(|e| ServerError::XlsxError(format!("Failed to name worksheet: {e}")))?;

    let header_format = Format::new().set_bold();

    // Headers
    for (col, header) in COLUMNS.iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, *header, &header_format)
            .map_err(|e| {
                ServerError::XlsxError(format!("Failed to write header '{}': {}", header, e))
            })?;
    }

    // Rows
    for (i, program) in programs.iter().enumerate() {
        let program = program.as_ref();
        let r = (i + 1) as u32;

        for (col, value) in export_row(program).iter().enumerate() {
            let col = col as u16;
            if col == DURATION_COL {
                if let Some(weeks) = program.duration_weeks {
                    worksheet.write_number(r, col, weeks as f64).map_err(|e| {
                        ServerError::XlsxError(format!("Failed to write duration: {}", e))
                    })?;
                    continue;
                }
            }
            worksheet.write_string(r, col, value).map_err(|e| {
                ServerError::XlsxError(format!(
                    "Failed to write '{}' for {}: {}",
                    COLUMNS[col as usize], program.program_name, e
                ))
            })?;
        }
    }

    worksheet.set_column_width(0, 40).map_err(|e| {
        ServerError::XlsxError(format!("Failed to size name column: {}", e))
    })?;

    workbook
        .save_to_buffer()
        .map_err(|e| ServerError::XlsxError(format!("Failed to save workbook: {}", e)))
}
