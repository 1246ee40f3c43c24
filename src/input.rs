/// File suffix of the intensity logs.
pub const CSV_SUFFIX: &str = ".csv";

/// Return the first argument naming a CSV file.
pub fn find_csv_arg<S: AsRef<str>>(args: &[S]) -> Option<&str> {
    args.iter()
        .map(AsRef::as_ref)
        .find(|arg| arg.ends_with(CSV_SUFFIX))
}
