//! Tab-separated reference extract parsing.
//!
//! Extracts start with a header line, which is skipped unconditionally. Each
//! data line holds exactly three (streets) or four (house numbers)
//! tab-separated fields. Surrounding whitespace, tabs included, is trimmed
//! from the whole line before it is split. Any other field count, a blank
//! line included, aborts the parse so a partially read extract never reaches
//! the cache.

use std::io::{self, BufRead, BufReader};

use camino::Utf8Path;
use refcheck_core::{ReferenceHouseNumberTable, ReferenceStreetTable};
use refcheck_fs::open_utf8_file;

use crate::error::ReferenceError;

/// Placeholder the registry appends to streets without a type suffix.
pub const NULL_STREET_SUFFIX: &str = " null";

/// Parse a street extract (`region`, `settlement`, `street`).
///
/// # Examples
/// ```no_run
/// use camino::Utf8Path;
/// use refcheck_data::parse_streets;
///
/// let table = parse_streets(Utf8Path::new("refdata/streets.tsv")).expect("parse streets");
/// for region in table.regions() {
///     println!("{region}");
/// }
/// ```
pub fn parse_streets(path: &Utf8Path) -> Result<ReferenceStreetTable, ReferenceError> {
    let reader = open_reference(path)?;
    read_streets(reader, path)
}

/// Parse a house-number extract (`region`, `settlement`, `street`,
/// `house number`).
pub fn parse_house_numbers(path: &Utf8Path) -> Result<ReferenceHouseNumberTable, ReferenceError> {
    let reader = open_reference(path)?;
    read_house_numbers(reader, path)
}

pub(crate) fn read_streets<R: BufRead>(
    reader: R,
    path: &Utf8Path,
) -> Result<ReferenceStreetTable, ReferenceError> {
    let mut table = ReferenceStreetTable::new();
    for_each_record(reader, path, |[region, settlement, street]: [&str; 3]| {
        let name = street.strip_suffix(NULL_STREET_SUFFIX).unwrap_or(street);
        table.insert(region, settlement, name.to_owned());
    })?;
    Ok(table)
}

pub(crate) fn read_house_numbers<R: BufRead>(
    reader: R,
    path: &Utf8Path,
) -> Result<ReferenceHouseNumberTable, ReferenceError> {
    let mut table = ReferenceHouseNumberTable::new();
    for_each_record(
        reader,
        path,
        |[region, settlement, street, house_number]: [&str; 4]| {
            table.insert(region, settlement, street, house_number.to_owned());
        },
    )?;
    Ok(table)
}

fn open_reference(path: &Utf8Path) -> Result<impl BufRead, ReferenceError> {
    match open_utf8_file(path) {
        Ok(file) => Ok(BufReader::new(file)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Err(ReferenceError::NotFound {
            path: path.to_path_buf(),
        }),
        Err(source) => Err(ReferenceError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Feed every data line of `reader` to `visit` as exactly `N` fields.
fn for_each_record<const N: usize, R, F>(
    reader: R,
    path: &Utf8Path,
    mut visit: F,
) -> Result<(), ReferenceError>
where
    R: BufRead,
    F: FnMut([&str; N]),
{
    for (index, read) in reader.lines().enumerate() {
        let text = read.map_err(|source| ReferenceError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        if index == 0 {
            continue;
        }
        let fields: Vec<&str> = text.trim().split('\t').collect();
        let record = <[&str; N]>::try_from(fields.as_slice()).map_err(|_| {
            ReferenceError::Malformed {
                path: path.to_path_buf(),
                line: index.saturating_add(1),
                expected: N,
                found: fields.len(),
            }
        })?;
        visit(record);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Cursor;

    const HEADER: &str = "megye\ttelepules\tutcanev\n";

    fn streets(body: &str) -> Result<ReferenceStreetTable, ReferenceError> {
        read_streets(Cursor::new(format!("{HEADER}{body}")), Utf8Path::new("streets.tsv"))
    }

    fn house_numbers(body: &str) -> Result<ReferenceHouseNumberTable, ReferenceError> {
        read_house_numbers(
            Cursor::new(format!("{HEADER}{body}")),
            Utf8Path::new("housenumbers.tsv"),
        )
    }

    #[rstest]
    fn single_row_yields_single_street() {
        let table = streets("01\t001\tMain St\n").expect("parse");
        assert_eq!(table.regions().collect::<Vec<_>>(), ["01"]);
        assert_eq!(table.settlements("01").collect::<Vec<_>>(), ["001"]);
        assert_eq!(table.streets("01", "001"), ["Main St"]);
    }

    #[rstest]
    #[case("01\t011\tTörökugrató utca null\n", "Törökugrató utca")]
    #[case("01\t011\tHamzsabégi út  \n", "Hamzsabégi út")]
    #[case("01\t011\tnull\n", "null")]
    #[case("01\t011\tAlsó null utca\n", "Alsó null utca")]
    fn street_names_are_normalised(#[case] body: &str, #[case] expected: &str) {
        let table = streets(body).expect("parse");
        assert_eq!(table.streets("01", "011"), [expected]);
    }

    #[rstest]
    fn header_is_skipped_even_when_it_looks_like_data() {
        let table = read_streets(
            Cursor::new("01\t011\tHeader utca\n01\t011\tData utca\n"),
            Utf8Path::new("streets.tsv"),
        )
        .expect("parse");
        assert_eq!(table.streets("01", "011"), ["Data utca"]);
    }

    #[rstest]
    fn source_order_is_kept_within_a_settlement() {
        let table = streets("01\t011\tZsálya utca\n01\t011\tAdy utca\n02\t013\tFő tér\n")
            .expect("parse");
        assert_eq!(table.streets("01", "011"), ["Zsálya utca", "Ady utca"]);
        assert_eq!(table.street_count(), 3);
    }

    #[rstest]
    fn crlf_line_endings_are_tolerated() {
        let table = streets("01\t011\tAdy utca\r\n01\t011\tFő utca\r\n").expect("parse");
        assert_eq!(table.streets("01", "011"), ["Ady utca", "Fő utca"]);
    }

    #[rstest]
    fn trailing_tab_is_trimmed_with_the_line() {
        let table = streets("01\t011\tKossuth utca\t\n").expect("parse");
        assert_eq!(table.streets("01", "011"), ["Kossuth utca"]);
    }

    #[rstest]
    #[case("01\t011\tKossuth utca\t\n", 2, 3)]
    #[case("01\t011\tKossuth utca\t  \n", 2, 3)]
    #[case("01\t011\tKossuth utca\t2\n\n01\t011\tKossuth utca\t4\n", 3, 1)]
    fn empty_house_number_field_or_blank_line_is_fatal(
        #[case] body: &str,
        #[case] expected_line: usize,
        #[case] expected_found: usize,
    ) {
        let err = house_numbers(body).expect_err("malformed line must fail");
        match err {
            ReferenceError::Malformed {
                line,
                expected,
                found,
                ..
            } => {
                assert_eq!(line, expected_line);
                assert_eq!(expected, 4);
                assert_eq!(found, expected_found);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[rstest]
    fn empty_extract_yields_empty_table() {
        let table = read_streets(Cursor::new(""), Utf8Path::new("streets.tsv")).expect("parse");
        assert!(table.is_empty());
    }

    #[rstest]
    #[case("01\t011\n", 2, 2)]
    #[case("01\t011\tAdy utca\n01\t011\tFő utca\textra\n", 3, 4)]
    #[case("01\t011\tA utca\n\n01\t011\tB utca\n", 3, 1)]
    #[case("01\t011\tA utca\n   \n", 3, 1)]
    fn wrong_field_count_is_fatal(
        #[case] body: &str,
        #[case] expected_line: usize,
        #[case] expected_found: usize,
    ) {
        let err = streets(body).expect_err("malformed line must fail");
        match err {
            ReferenceError::Malformed {
                path,
                line,
                expected,
                found,
            } => {
                assert_eq!(path, "streets.tsv");
                assert_eq!(line, expected_line);
                assert_eq!(expected, 3);
                assert_eq!(found, expected_found);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[rstest]
    fn house_numbers_group_by_street() {
        let table = house_numbers(
            "01\t011\tKossuth utca\t2\n01\t011\tKossuth utca\t4/A\n01\t011\tAdy utca\t1*\n",
        )
        .expect("parse");
        assert_eq!(table.house_numbers("01", "011", "Kossuth utca"), ["2", "4/A"]);
        assert_eq!(table.house_numbers("01", "011", "Ady utca"), ["1*"]);
        assert_eq!(table.entry_count(), 3);
    }

    #[rstest]
    fn house_numbers_keep_null_suffix_in_street() {
        let table = house_numbers("01\t011\tKossuth null\t2\n").expect("parse");
        assert_eq!(table.house_numbers("01", "011", "Kossuth null"), ["2"]);
    }

    #[rstest]
    fn street_row_in_house_number_extract_is_rejected() {
        let err = house_numbers("01\t011\tKossuth utca\n").expect_err("missing field");
        assert!(matches!(
            err,
            ReferenceError::Malformed {
                line: 2,
                expected: 4,
                found: 3,
                ..
            }
        ));
    }

    #[rstest]
    fn invalid_utf8_is_a_read_error() {
        let mut bytes = HEADER.as_bytes().to_vec();
        bytes.extend_from_slice(b"01\t011\t\xff\xfe\n");
        let err = read_streets(Cursor::new(bytes), Utf8Path::new("streets.tsv"))
            .expect_err("invalid utf-8 must fail");
        assert!(matches!(err, ReferenceError::Read { .. }));
    }
}
