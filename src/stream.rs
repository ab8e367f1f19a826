use crate::config::InputRules;
use crate::filter::Filter;
use crate::record::parse_record;
use std::io::{self, BufRead, Write};

#[derive(Debug, Clone, Copy, Default)]
pub struct StreamOptions {
    /// Emit lines whose record does not match instead of those that do.
    pub invert: bool,
    /// Suppress line output; only `ScanStats::lines_matched` is of interest.
    pub count_only: bool,
}

/// Counters accumulated across every input source
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    pub lines_read: usize,
    pub records_parsed: usize,
    pub lines_skipped: usize,
    pub lines_matched: usize,
}

impl ScanStats {
    pub fn merge(&mut self, other: ScanStats) {
        self.lines_read += other.lines_read;
        self.records_parsed += other.records_parsed;
        self.lines_skipped += other.lines_skipped;
        self.lines_matched += other.lines_matched;
    }
}

/// Run every line of `reader` through `filter`, writing selected lines to `out`.
///
/// Lines are written verbatim. Lines that do not yield a record are never
/// selected, even when `invert` is set. Bytes that are not valid UTF-8 are
/// decoded lossily for matching; only I/O failures end the scan.
pub fn filter_lines<R: BufRead, W: Write>(
    mut reader: R,
    filter: &Filter,
    rules: &InputRules,
    options: StreamOptions,
    out: &mut W,
) -> io::Result<ScanStats> {
    let mut stats = ScanStats::default();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        let raw = trim_line_ending(&buf);
        stats.lines_read += 1;

        let line = String::from_utf8_lossy(raw);
        let Some(record) = parse_record(&line, rules) else {
            tracing::trace!(line = stats.lines_read, "no record in line, skipping");
            stats.lines_skipped += 1;
            continue;
        };
        stats.records_parsed += 1;

        if filter.matches(&record) != options.invert {
            stats.lines_matched += 1;
            if !options.count_only {
                out.write_all(raw)?;
                out.write_all(b"\n")?;
            }
        }
    }

    Ok(stats)
}

fn trim_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}
