use crate::ordered::OrderedMap;

/// Raw metrics reported by one invocation of the diagnostic tool, keyed by
/// metric name in the order they were reported. Values are kept verbatim.
pub type MetricRecord = OrderedMap<String>;

/// Parses the `key: value` report written by a `time -v` style tool.
///
/// Lines without a colon are ignored, and so are lines whose text before the
/// first colon looks like a path (starts with `/` or `./`); the dynamic
/// loader prints its errors that way. The line is split on the first colon,
/// so values like `0:01.23` keep their own colons. A key reported twice keeps
/// its first position and its last value.
///
/// The path check also drops a genuine metric whose name begins with `/` or
/// `./`.
pub fn parse_metrics(text: &str) -> MetricRecord {
    let mut metrics = MetricRecord::new();
    for line in text.lines() {
        let Some((head, value)) = line.split_once(':') else {
            continue;
        };
        let key = head.trim();
        if key.starts_with('/') || key.starts_with("./") {
            continue;
        }
        metrics.insert(key, value.trim().to_owned());
    }
    metrics
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(record: &MetricRecord) -> Vec<(&str, &str)> {
        record.iter().map(|(k, v)| (k, v.as_str())).collect()
    }

    #[test]
    fn first_colon_splits() {
        let m = parse_metrics("Key A: 1\nKey B: two:three\n");
        assert_eq!(pairs(&m), [("Key A", "1"), ("Key B", "two:three")]);
    }

    #[test]
    fn empty_input() {
        assert!(parse_metrics("").is_empty());
        assert!(parse_metrics("\n\n   \n").is_empty());
    }

    #[test]
    fn skips_loader_errors() {
        let text = "/lib/ld-linux.so: error while loading shared libraries: libfoo.so: cannot open\n\
                    ./test0: error while loading shared libraries\n\
                    \tCommand being timed: \"./test0\"\n\
                    \tMaximum resident set size (kbytes): 4096\n";
        let m = parse_metrics(text);
        assert_eq!(
            pairs(&m),
            [
                ("Command being timed", "\"./test0\""),
                ("Maximum resident set size (kbytes)", "4096"),
            ]
        );
    }

    #[test]
    fn real_time_v_report() {
        let text = "\tCommand being timed: \"bench_tests/bin/test0\"
\tUser time (seconds): 0.01
\tSystem time (seconds): 0.00
\tPercent of CPU this job got: 92%
\tElapsed (wall clock) time (h:mm:ss or m:ss): 0:01.23
\tMaximum resident set size (kbytes): 4096
\tMinor (reclaiming a frame) page faults: 172
\tExit status: 0
";
        let m = parse_metrics(text);
        assert_eq!(m.len(), 8);
        // the key itself holds colons, so it is cut at the first one
        assert_eq!(
            m.get("Elapsed (wall clock) time (h").map(String::as_str),
            Some("mm:ss or m:ss): 0:01.23")
        );
        assert_eq!(m.get("Elapsed (wall clock) time (h:mm:ss or m:ss)"), None);
        assert_eq!(m.keys().last(), Some("Exit status"));
    }

    #[test]
    fn duplicate_key_last_value_first_position() {
        let m = parse_metrics("a: 1\nb: 2\na: 3\n");
        assert_eq!(pairs(&m), [("a", "3"), ("b", "2")]);
    }

    #[test]
    fn lines_without_colon_ignored() {
        let m = parse_metrics("smoke: OK\nsegmentation fault\nExit status: 139");
        assert_eq!(pairs(&m), [("smoke", "OK"), ("Exit status", "139")]);
    }
}
