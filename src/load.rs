//! Reading a dataset from the tab-separated tables produced by the Bockstein spectral sequence
//! program.
//!
//! A dataset is identified by a prefix, e.g. `data/185`, and consists of the files
//! `{prefix}_BPBocSS_table.txt`, `{prefix}_BPAANSS_table.txt`, `{prefix}_BPB2A_table.txt` and a
//! number of multiplication tables.

use std::{
    ffi::OsString,
    fs::File,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
};

use lincomb::{Coefficient, LinComb, Table};
use nom::{
    bytes::complete::{tag, take_until, take_while},
    character::complete::{char, digit1 as digit},
    combinator::{map_res, rest},
    sequence::{pair, preceded, separated_pair},
    IResult,
};
use rustc_hash::FxHashMap;

use crate::{
    bockstein_table::BocksteinTable,
    context::Dataset,
    degree::{Degree, DegreeTable},
    operator::BetaOperator,
    Error, Result,
};

const ARROW: &str = "\t->\t";

/// The term denoting zero in multiplication tables.
const ZERO_TERM: &str = "o";

fn with_suffix(prefix: &Path, suffix: &str) -> PathBuf {
    let mut path = OsString::from(prefix.as_os_str());
    path.push(suffix);
    path.into()
}

fn open(path: &Path) -> Result<BufReader<File>> {
    match File::open(path) {
        Ok(f) => {
            tracing::info!("open for reading: {}", path.display());
            Ok(BufReader::new(f))
        }
        Err(source) => Err(Error::Io {
            path: path.to_owned(),
            source,
        }),
    }
}

/// The nonempty lines of `reader`, with 1-based line numbers and line endings removed.
fn lines<'a>(
    path: &'a Path,
    reader: impl BufRead + 'a,
) -> impl Iterator<Item = Result<(usize, String)>> + 'a {
    reader
        .lines()
        .enumerate()
        .filter_map(move |(n, line)| match line {
            Ok(line) => {
                let line = line.trim_end_matches(['\n', '\r']);
                (!line.is_empty()).then(|| Ok((n + 1, line.to_string())))
            }
            Err(source) => Some(Err(Error::Io {
                path: path.to_owned(),
                source,
            })),
        })
}

fn parse_error(path: &Path, line: usize, message: impl Into<String>) -> Error {
    Error::Parse {
        path: path.to_owned(),
        line,
        message: message.into(),
    }
}

fn mult_line(i: &str) -> IResult<&str, (&str, &str)> {
    separated_pair(take_until(ARROW), tag(ARROW), rest)(i)
}

/// An algNSS name looks like `v1^2[3,1]`, where the first number in the brackets is the ANSS
/// filtration.
fn anss_filtration(i: &str) -> IResult<&str, i32> {
    preceded(
        pair(
            take_while(|c: char| c == 'v' || c == '^' || c.is_ascii_digit()),
            char('['),
        ),
        map_res(digit, str::parse),
    )(i)
}

/// Read a table whose lines look like `x\t->\ty+z`. Every term has coefficient 1, and the term
/// `o` stands for zero.
pub fn read_table(name: &str, path: &Path, reader: impl BufRead) -> Result<Table> {
    let mut table = Table::new(name);
    for line in lines(path, reader) {
        let (n, line) = line?;
        let (_, (src, target)) =
            mult_line(&line).map_err(|_| parse_error(path, n, format!("missing {ARROW:?}")))?;
        if src.is_empty() {
            return Err(parse_error(path, n, "empty source"));
        }
        let value = target
            .split('+')
            .filter(|&t| !t.is_empty() && t != ZERO_TERM)
            .map(|t| (t, Coefficient::ONE))
            .collect::<LinComb>();
        table.insert(src, value);
    }
    Ok(table)
}

/// Read the Bockstein differentials. A line `target\t_\tsource\tlength\t_` records a
/// differential unless `length` is a `d0`. Every line without `<-` is a permanent cycle.
pub fn read_bockstein(path: &Path, reader: impl BufRead) -> Result<BocksteinTable> {
    let mut table = BocksteinTable::new();
    for line in lines(path, reader) {
        let (n, line) = line?;
        let fields: Vec<&str> = line.split('\t').collect();
        if line.contains("<-") {
            let &[target, _, source, length, _] = &fields[..] else {
                return Err(parse_error(
                    path,
                    n,
                    format!("expected 5 fields, found {}", fields.len()),
                ));
            };
            if !length.contains("d0") {
                table.add_differential(source, target);
            }
        } else {
            table.add_bottom_cell(fields[0]);
        }
    }
    Ok(table)
}

/// Read the degrees of algNSS generators. Fields are separated by `\t|`; the last one contains
/// the stem and Adams filtration, e.g. `(10,3)`.
pub fn read_degrees(path: &Path, reader: impl BufRead) -> Result<DegreeTable> {
    let mut table = DegreeTable::new();
    for line in lines(path, reader) {
        let (n, line) = line?;
        if line.contains("<-") {
            continue;
        }
        let items: Vec<&str> = line.split("\t|").collect();
        let name = items[0];
        let last: String = items[items.len() - 1]
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == ',')
            .collect();
        let mut numbers = last.split(',').map(str::parse::<i32>);
        let (Some(Ok(stem)), Some(Ok(adams_filtration))) = (numbers.next(), numbers.next()) else {
            return Err(parse_error(path, n, format!("cannot read degree from {last:?}")));
        };
        let (_, filtration) = anss_filtration(name)
            .map_err(|_| parse_error(path, n, format!("cannot read filtration of {name}")))?;
        table.insert(
            name,
            Degree::new(stem, filtration, adams_filtration - filtration),
        );
    }
    Ok(table)
}

/// Load every table of the dataset with the given prefix.
#[tracing::instrument]
pub fn load_dataset(prefix: &Path) -> Result<Dataset> {
    let table = |name: &str, suffix: &str| -> Result<Table> {
        let path = with_suffix(prefix, suffix);
        read_table(name, &path, open(&path)?)
    };

    let path = with_suffix(prefix, "_BPBocSS_table.txt");
    let bockstein = read_bockstein(&path, open(&path)?)?;
    let path = with_suffix(prefix, "_BPAANSS_table.txt");
    let degrees = read_degrees(&path, open(&path)?)?;

    let mut beta = FxHashMap::default();
    for op in BetaOperator::ALL {
        beta.insert(op, table(&op.to_string(), op.file_suffix())?);
    }

    Ok(Dataset {
        bockstein,
        boc_a0: table("boc_a0", "_BPBocSS_a0.txt")?,
        boc_h0: table("boc_h0", "_BPBocSS_h0.txt")?,
        a0: table("a0", "_BPAANSS_a0.txt")?,
        h0: table("h0", "_BPAANSS_h0.txt")?,
        b2a: table("b2a", "_BPB2A_table.txt")?,
        beta,
        degrees,
    })
}
