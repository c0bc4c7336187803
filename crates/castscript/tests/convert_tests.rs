//! Integration tests for the stream converter.

use castscript::asciicast::{self, AsciicastReader};
use castscript::prelude::*;
use castscript::script;

const SCRIPT_HEADER: &str =
    "Script started on 2025-04-01 12:34:56+05:00 [TERM=\"xterm\" TTY=\"/dev/pts/1\" COLUMNS=\"80\" LINES=\"24\"]\n";

fn to_cast(typescript: &[u8], timing: &str, version: CastVersion) -> (Vec<u8>, ConversionStats) {
    let mut out = Vec::new();
    let config = ConvertConfig::new().cast_version(version);
    let stats = script_to_asciicast(typescript, timing.as_bytes(), &mut out, &config).unwrap();
    (out, stats)
}

fn to_script(cast: &str, config: &ConvertConfig) -> (String, String, ConversionStats) {
    let (mut typescript, mut timing) = (Vec::new(), Vec::new());
    let stats = asciicast_to_script(cast.as_bytes(), &mut typescript, &mut timing, config).unwrap();
    (
        String::from_utf8(typescript).unwrap(),
        String::from_utf8(timing).unwrap(),
        stats,
    )
}

fn read_cast(output: &[u8]) -> (asciicast::Header, Vec<asciicast::Event>) {
    let mut reader = AsciicastReader::new(output);
    let header = reader.read_header().unwrap().unwrap();
    let events = reader.collect::<Result<Vec<_>>>().unwrap();
    (header, events)
}

#[test]
fn script_times_accumulate_for_v2() {
    let typescript = format!("{SCRIPT_HEADER}abc");
    let (out, _) = to_cast(
        typescript.as_bytes(),
        "O 1.0 1\nO 0.5 1\nO 2.0 1\n",
        CastVersion::V2,
    );
    let (header, events) = read_cast(&out);

    assert_eq!(header.version(), CastVersion::V2);
    let times: Vec<f64> = events.iter().map(|e| e.time).collect();
    assert_eq!(times, vec![1.0, 1.5, 3.5]);
}

#[test]
fn script_times_stay_relative_for_v3() {
    let typescript = format!("{SCRIPT_HEADER}abc");
    let (out, _) = to_cast(
        typescript.as_bytes(),
        "O 1.0 1\nO 0.5 1\nO 2.0 1\n",
        CastVersion::V3,
    );
    let (header, events) = read_cast(&out);

    assert_eq!(header.version(), CastVersion::V3);
    let times: Vec<f64> = events.iter().map(|e| e.time).collect();
    assert_eq!(times, vec![1.0, 0.5, 2.0]);
}

#[test]
fn dropped_script_event_does_not_shift_v3_times() {
    let typescript = format!("{SCRIPT_HEADER}ab");
    let (out, stats) = to_cast(
        typescript.as_bytes(),
        "O 1.0 1\nR 0.5 0\nO 0.25 1\n",
        CastVersion::V3,
    );
    let (_, events) = read_cast(&out);

    assert_eq!(stats.events_dropped, 1);
    let times: Vec<f64> = events.iter().map(|e| e.time).collect();
    assert_eq!(times, vec![1.0, 0.25]);
}

#[test]
fn cast_without_timestamp_starts_at_year_one() {
    let cast = "{\"version\": 2, \"width\": 80, \"height\": 24}\n";
    let (typescript, _, _) = to_script(cast, &ConvertConfig::new());
    assert_eq!(
        typescript,
        "Script started on 0001-01-01 00:00:00+00:00 [COLUMNS=\"80\" LINES=\"24\"]\n"
    );
}

#[test]
fn script_header_maps_to_cast_header() {
    let (out, _) = to_cast(SCRIPT_HEADER.as_bytes(), "", CastVersion::V2);
    let (header, events) = read_cast(&out);

    assert!(events.is_empty());
    assert_eq!((header.width(), header.height()), (80, 24));
    assert_eq!(header.term(), Some("xterm"));
    // 12:34:56+05:00 is 07:34:56 UTC.
    assert_eq!(header.timestamp(), Some(1_743_492_896));
}

#[test]
fn script_resize_is_dropped() {
    let typescript = format!("{SCRIPT_HEADER}ab");
    let (out, stats) = to_cast(
        typescript.as_bytes(),
        "O 0.1 1\nR 0.2 0\nI 0.3 1\n",
        CastVersion::V2,
    );
    let (_, events) = read_cast(&out);

    assert_eq!(stats.events_read, 3);
    assert_eq!(stats.events_written, 2);
    assert_eq!(stats.events_dropped, 1);
    assert!(stats.events_written <= stats.events_read);
    assert_eq!(events[0], asciicast::Event::output(0.1, "a"));
    assert_eq!(events[1].code, "i");
    assert_eq!(events[1].data, "b");
    assert!((events[1].time - 0.6).abs() < 1e-9);
}

#[test]
fn classic_timing_is_output() {
    let typescript = format!("{SCRIPT_HEADER}hello");
    let (out, _) = to_cast(typescript.as_bytes(), "0.25 5\n", CastVersion::V2);
    let (_, events) = read_cast(&out);

    assert_eq!(events, vec![asciicast::Event::output(0.25, "hello")]);
}

#[test]
fn short_typescript_is_an_error() {
    let typescript = format!("{SCRIPT_HEADER}ab");
    let mut out = Vec::new();
    let err = script_to_asciicast(
        typescript.as_bytes(),
        &b"O 0.1 10\n"[..],
        &mut out,
        &ConvertConfig::new(),
    )
    .unwrap_err();
    assert!(err.is_io());
}

#[test]
fn malformed_timing_is_an_error() {
    let typescript = format!("{SCRIPT_HEADER}ab");
    let mut out = Vec::new();
    let err = script_to_asciicast(
        typescript.as_bytes(),
        &b"O fast 1\n"[..],
        &mut out,
        &ConvertConfig::new(),
    )
    .unwrap_err();
    assert!(err.is_structural());
}

#[test]
fn bad_script_header_is_an_error() {
    let mut out = Vec::new();
    let err = script_to_asciicast(
        &b"not a script header\n"[..],
        &b""[..],
        &mut out,
        &ConvertConfig::new(),
    )
    .unwrap_err();
    assert!(matches!(err, CastError::InvalidHeader { .. }));
    assert!(out.is_empty());
}

#[test]
fn empty_inputs_produce_nothing() {
    let (out, stats) = to_cast(b"", "", CastVersion::V2);
    assert!(out.is_empty());
    assert_eq!(stats, ConversionStats::default());

    let (typescript, timing, stats) = to_script("", &ConvertConfig::new());
    assert!(typescript.is_empty());
    assert!(timing.is_empty());
    assert_eq!(stats, ConversionStats::default());
}

#[test]
fn v2_cast_to_script() {
    let cast = concat!(
        "{\"version\": 2, \"width\": 100, \"height\": 30, \"timestamp\": 1743510896, ",
        "\"command\": \"bash -l\", \"env\": {\"TERM\": \"screen\", \"SHELL\": \"/bin/bash\"}}\n",
        "[0.5, \"o\", \"$ \"]\n",
        "[1.0, \"i\", \"ls\\r\"]\n",
        "[1.25, \"o\", \"\\u001b[1mfile\\u001b[0m\\r\\n\"]\n",
    );
    let (typescript, timing, stats) = to_script(cast, &ConvertConfig::new());

    assert_eq!(stats.events_written, 3);
    assert_eq!(
        typescript,
        concat!(
            "Script started on 2025-04-01 12:34:56+00:00 [COMMAND=\"bash -l\" TERM=\"screen\" COLUMNS=\"100\" LINES=\"30\"]\n",
            "$ ls\r\u{1b}[1mfile\u{1b}[0m\r\n",
        )
    );
    assert_eq!(
        timing,
        "O 0.500000 2\nI 0.500000 3\nO 0.250000 14\n"
    );
}

#[test]
fn cast_resize_and_marker_are_dropped() {
    let cast = concat!(
        "{\"version\": 2, \"width\": 80, \"height\": 24}\n",
        "[0.5, \"o\", \"a\"]\n",
        "[0.7, \"r\", \"100x30\"]\n",
        "[0.8, \"m\", \"chapter\"]\n",
        "[1.0, \"o\", \"b\"]\n",
    );
    let (typescript, timing, stats) = to_script(cast, &ConvertConfig::new());

    assert_eq!(stats.events_read, 4);
    assert_eq!(stats.events_dropped, 2);
    assert!(typescript.ends_with("ab"));
    assert_eq!(timing, "O 0.500000 1\nO 0.500000 1\n");
}

#[test]
fn cast_comments_and_blank_lines_are_skipped() {
    let cast = concat!(
        "{\"version\": 3, \"term\": {\"cols\": 80, \"rows\": 24, \"type\": \"xterm\"}}\n",
        "# recorded by hand\n",
        "\n",
        "[0.5, \"o\", \"a\"]\n",
    );
    let (typescript, timing, _) = to_script(cast, &ConvertConfig::new());

    assert!(typescript.contains("TERM=\"xterm\""));
    assert_eq!(timing, "O 0.500000 1\n");
}

#[test]
fn unsupported_cast_version() {
    let cast = "{\"version\": 5, \"width\": 80, \"height\": 24}\n";
    let (mut typescript, mut timing) = (Vec::new(), Vec::new());
    let err = asciicast_to_script(
        cast.as_bytes(),
        &mut typescript,
        &mut timing,
        &ConvertConfig::new(),
    )
    .unwrap_err();

    assert!(err.is_version());
    assert!(err.to_string().contains('5'));
    assert!(typescript.is_empty());
}

#[test]
fn cast_event_arity_errors() {
    for line in ["[0.5, \"o\"]", "[0.5, \"o\", \"a\", \"b\"]"] {
        let cast = format!("{{\"version\": 2, \"width\": 80, \"height\": 24}}\n{line}\n");
        let (mut typescript, mut timing) = (Vec::new(), Vec::new());
        let err = asciicast_to_script(
            cast.as_bytes(),
            &mut typescript,
            &mut timing,
            &ConvertConfig::new(),
        )
        .unwrap_err();
        assert!(matches!(err, CastError::EventArity { .. }), "{line}: {err}");
    }
}

#[test]
fn cast_event_type_error() {
    let cast = "{\"version\": 2, \"width\": 80, \"height\": 24}\n[0.5, 1, \"a\"]\n";
    let (mut typescript, mut timing) = (Vec::new(), Vec::new());
    let err = asciicast_to_script(
        cast.as_bytes(),
        &mut typescript,
        &mut timing,
        &ConvertConfig::new(),
    )
    .unwrap_err();
    assert!(matches!(err, CastError::EventFieldType { field: "code" }));
}

#[test]
fn script_to_cast_to_script() {
    let typescript = format!("{SCRIPT_HEADER}$ ls\r\nfile\r\n");
    let timing = "O 0.100000 2\nI 0.200000 3\nO 0.300000 7\n";
    let (cast, _) = to_cast(typescript.as_bytes(), timing, CastVersion::V3);

    let cast = String::from_utf8(cast).unwrap();
    let (typescript_back, timing_back, _) = to_script(&cast, &ConvertConfig::new());

    assert_eq!(timing_back, timing);
    let header = script::Header::parse(typescript_back.lines().next().unwrap()).unwrap();
    assert_eq!(header.term.as_deref(), Some("xterm"));
    assert_eq!((header.columns, header.lines), (80, 24));
    assert!(typescript_back.ends_with("$ ls\r\nfile\r\n"));
}
