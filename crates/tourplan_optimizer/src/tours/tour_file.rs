use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use tracing::debug;

use crate::{error::CatalogFileError, problem::instance::DEPOT};

use super::tour_table::TourTable;

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> CatalogFileError + '_ {
    move |source| CatalogFileError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Writes `count length` followed by one tour per line.
pub fn write<P: AsRef<Path>>(path: P, table: &TourTable) -> Result<(), CatalogFileError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_error(path))?;
    }

    let file = File::create(path).map_err(io_error(path))?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "{} {}", table.len(), table.tour_length()).map_err(io_error(path))?;
    for tuple in table.tuples().iter() {
        let line = tuple
            .iter()
            .map(|stop| stop.to_string())
            .collect::<Vec<_>>()
            .join(" ");
        writeln!(writer, "{line}").map_err(io_error(path))?;
    }
    writer.flush().map_err(io_error(path))?;

    debug!(tours = table.len(), path = %path.display(), "Wrote tour file");
    Ok(())
}

/// Reads a tour file. A missing or unreadable file is an error, never an
/// empty table.
pub fn read<P: AsRef<Path>>(path: P) -> Result<TourTable, CatalogFileError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(io_error(path))?;
    let table = parse(&content)?;

    debug!(tours = table.len(), path = %path.display(), "Read tour file");
    Ok(table)
}

pub fn parse(content: &str) -> Result<TourTable, CatalogFileError> {
    let mut tokens = content.split_whitespace().enumerate();

    let mut header = || -> Result<usize, CatalogFileError> {
        let (position, token) = tokens.next().ok_or(CatalogFileError::MissingHeader)?;
        token.parse().map_err(|_| CatalogFileError::InvalidToken {
            token: token.to_owned(),
            position,
        })
    };
    let count = header()?;
    let tour_length = header()?;

    // a tour holds at least the depot it leaves from and returns to
    let expected = count
        .checked_mul(tour_length)
        .filter(|_| tour_length >= 2)
        .ok_or(CatalogFileError::InvalidHeader { count, tour_length })?;
    let values = tokens
        .by_ref()
        .take(expected)
        .map(|(position, token)| {
            token
                .parse::<i64>()
                .map_err(|_| CatalogFileError::InvalidToken {
                    token: token.to_owned(),
                    position,
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    if values.len() < expected {
        return Err(CatalogFileError::Truncated {
            expected,
            found: values.len(),
        });
    }

    let extra = tokens.count();
    if extra > 0 {
        return Err(CatalogFileError::TrailingData { extra });
    }

    let tuples = values
        .chunks(tour_length)
        .take(count)
        .map(<[i64]>::to_vec)
        .collect::<Vec<_>>();

    if let Some(tour) = tuples.iter().position(|tuple| {
        tuple.first() != Some(&(DEPOT as i64)) || tuple.last() != Some(&(DEPOT as i64))
    }) {
        return Err(CatalogFileError::NotDepotBookended { tour });
    }

    Ok(TourTable::new(tuples, tour_length))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let table = parse("2 5\n0 0 0 0 0\n0 1 3 2 0\n").unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.tour_length(), 5);
        assert_eq!(table.tuples()[1], vec![0, 1, 3, 2, 0]);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(parse(""), Err(CatalogFileError::MissingHeader)));
        assert!(matches!(parse("2"), Err(CatalogFileError::MissingHeader)));
        assert!(matches!(
            parse("1 3 0 x 0"),
            Err(CatalogFileError::InvalidToken { position: 3, .. })
        ));
        assert!(matches!(
            parse("2 3 0 1 0"),
            Err(CatalogFileError::Truncated {
                expected: 6,
                found: 3
            })
        ));
        assert!(matches!(
            parse("1 3 0 1 0 0"),
            Err(CatalogFileError::TrailingData { extra: 1 })
        ));
        assert!(matches!(
            parse("2 3 0 1 0 0 2 1"),
            Err(CatalogFileError::NotDepotBookended { tour: 1 })
        ));
    }

    #[test]
    fn test_parse_rejects_bad_headers() {
        assert!(matches!(
            parse("3 0"),
            Err(CatalogFileError::InvalidHeader {
                count: 3,
                tour_length: 0
            })
        ));
        assert!(matches!(
            parse("1 1 0"),
            Err(CatalogFileError::InvalidHeader { tour_length: 1, .. })
        ));
        assert!(matches!(
            parse("18446744073709551615 2 0 0"),
            Err(CatalogFileError::InvalidHeader { tour_length: 2, .. })
        ));
    }
}
