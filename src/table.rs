//! Loading of the intensity logs written by the mesh tools.

use anyhow::{Context, Result, bail};
use ndarray::{Array1, Array2, ArrayView2};
use std::{io::Read, path::Path};

/// Column holding the cell identifier.
pub const CELL_ID_COL: usize = 0;
/// Column holding the normal direction index.
pub const NORMAL_DIR_COL: usize = 1;
/// Column holding the raw intensity.
pub const INTENSITY_COL: usize = 5;

/// Load a comma-delimited numeric table, skipping its header line.
///
/// The header is discarded unparsed, so its field count does not matter.
///
/// # Errors
/// Returns an error if the file cannot be opened, a field is not numeric,
/// or the data rows have inconsistent column counts.
pub fn load_table<P: AsRef<Path>>(file: P) -> Result<Array2<f64>> {
    let file = file.as_ref();
    let reader = reader_builder()
        .from_path(file)
        .with_context(|| format!("failed to open {file:?}"))?;
    read_table(reader).with_context(|| format!("failed to parse {file:?}"))
}

fn reader_builder() -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder.has_headers(false).flexible(true).trim(csv::Trim::All);
    builder
}

fn read_table<R: Read>(mut reader: csv::Reader<R>) -> Result<Array2<f64>> {
    let mut records = reader.records();
    if let Some(header) = records.next() {
        header.context("failed to read header")?;
    }

    let mut vals = Vec::new();
    let mut n_cols = None;
    let mut n_rows = 0;
    for (i_row, record) in records.enumerate() {
        let record = record.with_context(|| format!("failed to read row {i_row}"))?;

        let exp_n_cols = *n_cols.get_or_insert(record.len());
        if record.len() != exp_n_cols {
            bail!(
                "row {i_row} must have {exp_n_cols} columns, but has {}",
                record.len()
            );
        }

        for (i_col, field) in record.iter().enumerate() {
            let val = field.parse::<f64>().with_context(|| {
                format!("invalid number {field:?} at row {i_row}, column {i_col}")
            })?;
            vals.push(val);
        }
        n_rows += 1;
    }

    Array2::from_shape_vec((n_rows, n_cols.unwrap_or(0)), vals).context("failed to shape table")
}

/// Intensity profile: one sample per row of the log.
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub cell_id: Array1<f64>,
    pub normal_dir: Array1<f64>,
    pub intensity: Array1<f64>,
}

impl Profile {
    /// Extract the cell id, normal direction and intensity columns.
    pub fn from_table(table: ArrayView2<f64>) -> Result<Self> {
        let n_cols = table.ncols();
        if n_cols <= INTENSITY_COL {
            bail!(
                "table must have at least {} columns, but has {n_cols}",
                INTENSITY_COL + 1
            );
        }
        Ok(Self {
            cell_id: table.column(CELL_ID_COL).to_owned(),
            normal_dir: table.column(NORMAL_DIR_COL).to_owned(),
            intensity: table.column(INTENSITY_COL).to_owned(),
        })
    }

    pub(crate) fn len(&self) -> usize {
        self.cell_id.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn read_str(data: &str) -> Result<Array2<f64>> {
        read_table(reader_builder().from_reader(data.as_bytes()))
    }

    const LOG: &str = "\
cell,normal,x,y,z,intensity
1,0,0.5,0.5,0.5,293
2,0,1.5,0.5,0.5,363
3,1,2.5,0.5,0.5,223
";

    #[test]
    fn header_is_skipped() {
        let table = read_str(LOG).unwrap();
        assert_eq!(table.dim(), (3, 6));
        assert_eq!(table[[0, 0]], 1.0);
        assert_eq!(table[[2, 5]], 223.0);
    }

    #[test]
    fn row_count_is_line_count_minus_one() {
        let mut data = String::from("a,b,c,d,e,f\n");
        for i in 0..9 {
            data += &format!("{i},{},0,0,0,{}\n", i % 3, 200 + i * 10);
        }
        let n_lines = data.lines().count();
        let table = read_str(&data).unwrap();
        assert_eq!(table.nrows(), n_lines - 1);
    }

    #[test]
    fn whitespace_around_fields_is_trimmed() {
        let table = read_str("a, b\n 1 , 2.5\n").unwrap();
        assert_eq!(table, array![[1.0, 2.5]]);
    }

    #[test]
    fn header_only_gives_empty_table() {
        let table = read_str("a,b,c\n").unwrap();
        assert_eq!(table.nrows(), 0);
        assert_eq!(read_str("").unwrap().nrows(), 0);
    }

    #[test]
    fn header_field_count_is_ignored() {
        let short = read_str("cell,normal,intensity\n1,0,0,0,0,293\n2,0,0,0,0,363\n").unwrap();
        assert_eq!(short.dim(), (2, 6));
        assert_eq!(short[[1, 5]], 363.0);

        let trailing = read_str("cell,normal,x,y,z,intensity,\n1,0,0,0,0,293\n").unwrap();
        assert_eq!(trailing.dim(), (1, 6));
    }

    #[test]
    fn header_is_not_parsed_as_numbers() {
        let table = read_str("not,a,number\n1,2\n").unwrap();
        assert_eq!(table, array![[1.0, 2.0]]);
    }

    #[test]
    fn non_numeric_field_fails() {
        let error = read_str("a,b\n1,foo\n").unwrap_err();
        assert!(format!("{error:#}").contains("row 0, column 1"));
    }

    #[test]
    fn ragged_rows_fail() {
        let error = read_str("a,b,c\n1,2,3\n4,5\n").unwrap_err();
        assert!(format!("{error:#}").contains("row 1 must have 3 columns, but has 2"));
    }

    #[test]
    fn missing_file_fails() {
        assert!(load_table("does/not/exist.csv").is_err());
    }

    #[test]
    fn profile_extracts_columns() {
        let table = read_str(LOG).unwrap();
        let profile = Profile::from_table(table.view()).unwrap();
        assert_eq!(profile.len(), 3);
        assert_eq!(profile.cell_id, array![1.0, 2.0, 3.0]);
        assert_eq!(profile.normal_dir, array![0.0, 0.0, 1.0]);
        assert_eq!(profile.intensity, array![293.0, 363.0, 223.0]);
    }

    #[test]
    fn profile_needs_six_columns() {
        let table = read_str("a,b,c,d,e\n1,2,3,4,5\n").unwrap();
        assert!(Profile::from_table(table.view()).is_err());
    }
}
