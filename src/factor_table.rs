//! Packaged factor-table lookup: Cunningham-style `p^m - 1` factorizations
//! read from plain-text table files on disk.
//!
//! The tables themselves are an external collaborator (per the kernel's own
//! scope boundary, no table files ship with this crate); this module only
//! implements the lookup and verification logic against whatever tables the
//! caller has placed in the search directory. [`lookup`] returns `Ok(None)`
//! when no matching, verified entry is found — that is not an error, since
//! the caller (`factor::factor` in `Automatic` mode) treats it as a signal
//! to move on to Pollard rho.

use crate::bigint::BigInt;
use crate::error::{PrimitiveError, Result};
use crate::factor::{Factorization, FactorStats, PrimeFactor};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::{debug, warn};

/// Primes the table naming convention covers, and the filename each maps to.
/// `c{p:02}minus.txt` generalizes the one example the format gives
/// (`c02minus.txt` for p=2) to the full set of bases Cunningham-style tables
/// are published for.
const TABLE_PRIMES: &[u64] = &[2, 3, 5, 6, 7, 10, 11, 12];

fn table_filename(p: u64) -> Option<String> {
    if TABLE_PRIMES.contains(&p) {
        Some(format!("c{p:02}minus.txt"))
    } else {
        None
    }
}

fn header_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*n\s*#Fac\s+Factorisation").expect("valid regex"))
}

/// Directories searched for factor-table files, in order. Overridable via
/// `PRIMPOLY_FACTOR_TABLE_DIR` for tests and deployments that keep tables
/// outside the working directory.
fn search_roots() -> Vec<PathBuf> {
    let mut roots = Vec::new();
    if let Ok(dir) = std::env::var("PRIMPOLY_FACTOR_TABLE_DIR") {
        roots.push(PathBuf::from(dir));
    }
    roots.push(PathBuf::from("factor_tables"));
    roots.push(PathBuf::from("."));
    roots
}

fn find_table_file(p: u64) -> Result<Option<PathBuf>> {
    let filename = match table_filename(p) {
        Some(f) => f,
        None => return Ok(None),
    };
    for root in search_roots() {
        if !root.is_dir() {
            continue;
        }
        for entry in walkdir::WalkDir::new(&root)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if entry.file_type().is_file() && entry.file_name().to_string_lossy() == filename {
                return Ok(Some(entry.into_path()));
            }
        }
    }
    Ok(None)
}

/// One logical data row after joining continuation lines: the exponent `m`,
/// the `#Fac` field (informational only — not checked against the parsed
/// factor count), and the raw factorization text.
struct Row {
    m: u32,
    factorization_text: String,
}

/// Join physical lines into logical rows. A line ending in `\` continues on
/// the next physical line (the backslash is stripped, the lines
/// concatenated); a line ending in `.` terminates the row (the period is
/// kept as the row terminator and stripped before parsing); a line
/// containing `+` anywhere marks an incomplete factorization and is skipped
/// entirely.
fn join_logical_lines(body: &str) -> Vec<String> {
    let mut rows = Vec::new();
    let mut current = String::new();
    for raw_line in body.lines() {
        let line = raw_line.trim_end();
        if line.contains('+') {
            current.clear();
            continue;
        }
        if let Some(stripped) = line.strip_suffix('\\') {
            current.push_str(stripped.trim_end());
            current.push(' ');
            continue;
        }
        current.push_str(line);
        if !current.trim().is_empty() {
            rows.push(current.trim().trim_end_matches('.').trim().to_string());
        }
        current.clear();
    }
    rows
}

/// Parse one logical row (`"<m> <#fac> <factorization>"`) into a [`Row`].
fn parse_row(line: &str) -> Option<Row> {
    let mut parts = line.splitn(3, char::is_whitespace);
    let m: u32 = parts.next()?.parse().ok()?;
    let _num_fac = parts.next()?; // informational, unverified
    let factorization_text = parts.next()?.trim().to_string();
    Some(Row {
        m,
        factorization_text,
    })
}

/// Parse `"p1.e1 . p2.e2 . ..."`-style factor lists, where each token is
/// either a bare prime or `prime^exponent`.
fn parse_factor_list(text: &str) -> Result<Vec<PrimeFactor>> {
    let mut factors = Vec::new();
    for token in text.split('.') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        let (base, exp) = match token.split_once('^') {
            Some((b, e)) => (
                b.trim(),
                e.trim().parse::<u32>().map_err(|_| {
                    PrimitiveError::FactorizationCorrupt(format!("bad exponent in {token:?}"))
                })?,
            ),
            None => (token, 1),
        };
        let prime = BigInt::from_decimal_str(base).map_err(|_| {
            PrimitiveError::FactorizationCorrupt(format!("bad factor token {token:?}"))
        })?;
        factors.push(PrimeFactor {
            prime,
            multiplicity: exp,
        });
    }
    Ok(factors)
}

/// Verify a row's parsed factorization: every factor must be prime, and the
/// product must equal `p^m - 1`.
fn verify_row(p: u64, row: &Row) -> Result<Factorization> {
    let factors = parse_factor_list(&row.factorization_text)?;
    if factors.is_empty() {
        return Err(PrimitiveError::FactorizationCorrupt(format!(
            "empty factor list for p={p} m={}",
            row.m
        )));
    }
    for f in &factors {
        if !crate::factor::is_almost_surely_prime(&f.prime)? {
            return Err(PrimitiveError::FactorizationCorrupt(format!(
                "table claims {} is prime for p={p} m={}, but it is not",
                f.prime, row.m
            )));
        }
    }
    let factorization = Factorization {
        factors: factors.clone(),
        stats: FactorStats::default(),
    };
    let expected = BigInt::pow(p, row.m)
        .sub(&BigInt::from_u64(1))
        .map_err(|e| PrimitiveError::FactorizationCorrupt(e.to_string()))?;
    if factorization.product() != expected {
        return Err(PrimitiveError::FactorizationCorrupt(format!(
            "table product mismatch for p={p} m={}: table gives {}, expected {}",
            row.m,
            factorization.product(),
            expected
        )));
    }
    Ok(factorization)
}

/// Parse an entire table file's body, returning the verified rows keyed by
/// exponent. Rows that fail verification are logged and dropped rather than
/// failing the whole table — a single corrupt line shouldn't make every
/// other entry in the table unusable.
fn parse_table(p: u64, body: &str) -> Vec<(u32, Factorization)> {
    let header_seen = body.lines().any(|l| header_re().is_match(l));
    if !header_seen {
        warn!(p, "factor table missing expected header, parsing anyway");
    }
    let mut rows = Vec::new();
    for logical_line in join_logical_lines(body) {
        let Some(row) = parse_row(&logical_line) else {
            continue;
        };
        match verify_row(p, &row) {
            Ok(factorization) => rows.push((row.m, factorization)),
            Err(e) => warn!(p, m = row.m, error = %e, "dropping unverifiable table row"),
        }
    }
    rows
}

/// Look up the verified factorization of `p^m - 1` from the packaged
/// factor tables. Returns `Ok(None)` if no table exists for `p`, the table
/// file isn't found on disk, or the table has no entry for `m`.
pub fn lookup(p: u64, m: u32) -> Result<Option<Factorization>> {
    let path = match find_table_file(p)? {
        Some(path) => path,
        None => return Ok(None),
    };
    lookup_in_file(&path, p, m)
}

/// Same as [`lookup`] but against an explicit file path, used directly by
/// tests that build synthetic table fixtures.
pub fn lookup_in_file(path: &Path, p: u64, m: u32) -> Result<Option<Factorization>> {
    let body = std::fs::read_to_string(path)?;
    debug!(p, m, path = %path.display(), "parsing factor table");
    let rows = parse_table(p, &body);
    Ok(rows.into_iter().find(|(row_m, _)| *row_m == m).map(|(_, f)| f))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_fixture(dir: &tempfile::TempDir, name: &str, body: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(body.as_bytes()).unwrap();
        path
    }

    #[test]
    fn joins_backslash_continuations_and_keeps_period_terminated_rows() {
        let body = "n #Fac Factorisation\n\
                     4 2 2^4.5^2.\n\
                     20 4 2^4.5^2.11^2.61.1181.\n";
        let lines = join_logical_lines(body);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "20 4 2^4.5^2.11^2.61.1181");
    }

    #[test]
    fn continuation_line_is_joined_before_terminating_period() {
        let body = "n #Fac Factorisation\n\
                     20 4 2^4.5^2.11^2.\\\n61.1181.\n";
        let lines = join_logical_lines(body);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0], "20 4 2^4.5^2.11^2. 61.1181");
    }

    #[test]
    fn incomplete_row_marked_with_plus_is_skipped() {
        let body = "n #Fac Factorisation\n\
                     +30 1 999999999999999999999999999999.\n\
                     4 2 2^4.5^2.\n";
        let lines = join_logical_lines(body);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0], "4 2 2^4.5^2");
    }

    #[test]
    fn parse_factor_list_reads_exponents() {
        let factors = parse_factor_list("2^4.5^2.11^2.61.1181").unwrap();
        let got: Vec<(u64, u32)> = factors
            .iter()
            .map(|f| (f.prime.to_u64().unwrap(), f.multiplicity))
            .collect();
        assert_eq!(got, vec![(2, 4), (5, 2), (11, 2), (61, 1), (1181, 1)]);
    }

    #[test]
    fn lookup_verifies_and_returns_matching_row() {
        let dir = tempfile::tempdir().unwrap();
        // 3^20 - 1 = 2^4 * 5^2 * 11^2 * 61 * 1181 exactly (the worked example
        // from the spec); no extra factor needed to reach the target.
        let p = 3u64;
        let m = 20u32;
        let target = BigInt::pow(p, m).sub(&BigInt::from_u64(1)).unwrap();
        let body = format!("n #Fac Factorisation\n{m} 5 2^4.5^2.11^2.61.1181.\n");
        let path = write_fixture(&dir, "c03minus.txt", &body);
        let found = lookup_in_file(&path, p, m).unwrap().unwrap();
        assert_eq!(found.product(), target);
    }

    #[test]
    fn lookup_returns_none_for_missing_exponent() {
        let dir = tempfile::tempdir().unwrap();
        let body = "n #Fac Factorisation\n4 2 2^4.5^2.\n";
        let path = write_fixture(&dir, "c03minus.txt", body);
        assert!(lookup_in_file(&path, 3, 99).unwrap().is_none());
    }

    #[test]
    fn corrupt_product_is_dropped_not_returned() {
        let dir = tempfile::tempdir().unwrap();
        // deliberately wrong product for p=3, m=4 (3^4-1=80=2^4*5, not 2^3*5)
        let body = "n #Fac Factorisation\n4 2 2^3.5.\n";
        let path = write_fixture(&dir, "c03minus.txt", body);
        assert!(lookup_in_file(&path, 3, 4).unwrap().is_none());
    }
}
