use std::io::BufRead;

/// Reads a newline-delimited identifier list.
///
/// Each line is trimmed of surrounding whitespace; blank lines and lines
/// whose first non-whitespace character is `#` are skipped. Everything else
/// is accepted verbatim, in file order — no further validation happens here.
///
/// # Examples
/// ```
/// use kbench::list::read_identifier_list;
///
/// let text = "# test sequences\nseqA\n\n  seqB  \n#seqC\n";
/// let list = read_identifier_list(text.as_bytes()).unwrap();
/// assert_eq!(list, ["seqA", "seqB"]);
/// ```
///
/// # Errors
/// Returns an error if reading from the underlying source fails.
pub fn read_identifier_list<R: BufRead>(reader: R) -> std::io::Result<Vec<String>> {
    let mut identifiers = Vec::new();

    for line in reader.lines() {
        let line = line?;
        let entry = line.trim();

        if entry.is_empty() || entry.starts_with('#') {
            continue;
        }

        identifiers.push(entry.to_owned());
    }

    Ok(identifiers)
}

#[cfg(test)]
mod tests {
    use crate::list::read_identifier_list;

    #[test]
    fn test_empty_input() {
        let list = read_identifier_list("".as_bytes()).unwrap();
        assert!(list.is_empty());
    }

    #[test]
    fn test_order_preserved() {
        let list = read_identifier_list("31\n21\n55\n".as_bytes()).unwrap();
        assert_eq!(list, ["31", "21", "55"]);
    }

    #[test]
    fn test_blank_and_comment_lines_skipped() {
        let text = "\n   \n# header comment\nseqA\n\t\n   # indented comment\nseqB";
        let list = read_identifier_list(text.as_bytes()).unwrap();
        assert_eq!(list, ["seqA", "seqB"]);
    }

    #[test]
    fn test_entries_trimmed_but_otherwise_verbatim() {
        let list = read_identifier_list("  seq with spaces  \nseq#hash\n".as_bytes()).unwrap();
        assert_eq!(list, ["seq with spaces", "seq#hash"]);
    }
}
