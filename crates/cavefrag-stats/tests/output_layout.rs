//! Layout checks for the `.prm` / `.sec` files against fixture rock masses.

use cavefrag_core::CaveFace;
use cavefrag_stats::{
    distributions_from_blocks, write_prm, write_prm_to_path, write_sec, OutputContext, BIN_COUNT,
};
use cavefrag_test_utils::{cubes, granodiorite, primary_block};

const HEADER_LINES: usize = 4;
const LINES_PER_BIN: usize = 7;

fn lines(buf: Vec<u8>) -> Vec<String> {
    String::from_utf8(buf)
        .unwrap()
        .lines()
        .map(str::to_owned)
        .collect()
}

#[test]
fn secondary_file_shape() {
    let rock = granodiorite();
    let cave = CaveFace::default();
    let ctx = OutputContext {
        rock: &rock,
        cave: &cave,
        primary_fines_ratio: 0.1,
    };
    let blocks = cubes(12, 3.0);
    let mut buf = Vec::new();
    write_sec(&mut buf, &ctx, &blocks, 1.0).unwrap();
    let lines = lines(buf);

    assert_eq!(lines.len(), blocks.len() + HEADER_LINES + BIN_COUNT * LINES_PER_BIN);
    assert_eq!(lines[0], "3.000000 1.000000 0");
    assert_eq!(lines[12], "-1.0 -1.0 0");

    let summary = &lines[13];
    assert!(summary.starts_with("Granodiorite        12 1 130.000 "));
    assert!(summary.ends_with(" 0.000 0.100000"));

    let stats_line = &lines[15];
    assert!(stats_line.starts_with("3.000000 "));
    assert!(stats_line.ends_with(" 1.000000 1.000"));
}

#[test]
fn bin_groups_follow_distribution() {
    let rock = granodiorite();
    let cave = CaveFace::default();
    let ctx = OutputContext {
        rock: &rock,
        cave: &cave,
        primary_fines_ratio: 0.0,
    };
    let blocks: Vec<_> = [0.05, 0.5, 5.0, 50.0, 500.0]
        .iter()
        .map(|&v| primary_block(v, 1.3, 1))
        .collect();
    let stats = distributions_from_blocks(&blocks);
    let mut buf = Vec::new();
    write_prm(&mut buf, &ctx, &blocks).unwrap();
    let lines = lines(buf);

    let start = blocks.len() + HEADER_LINES;
    for (i, group) in lines[start..].chunks(LINES_PER_BIN).enumerate() {
        assert_eq!(group[0], stats.freq_counts[i].to_string());
        assert_eq!(group[3], format!("{:.3}", stats.cum_mass[i]));
        assert_eq!(group[5], group[2]);
        assert_eq!(group[6], group[3]);
    }
}

#[test]
fn path_writer_creates_file() {
    let dir = std::env::temp_dir().join(format!("cavefrag-stats-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("run.prm");

    let rock = granodiorite();
    let cave = CaveFace::default();
    let ctx = OutputContext {
        rock: &rock,
        cave: &cave,
        primary_fines_ratio: 0.0,
    };
    let blocks = vec![primary_block(1.0, 1.0, 0)];
    write_prm_to_path(&path, &ctx, &blocks).unwrap();

    let mut expected = Vec::new();
    write_prm(&mut expected, &ctx, &blocks).unwrap();
    assert_eq!(std::fs::read(&path).unwrap(), expected);
    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn missing_directory_reports_path() {
    let rock = granodiorite();
    let cave = CaveFace::default();
    let ctx = OutputContext {
        rock: &rock,
        cave: &cave,
        primary_fines_ratio: 0.0,
    };
    let path = std::env::temp_dir()
        .join("cavefrag-no-such-dir")
        .join("nested")
        .join("out.prm");
    let err = write_prm_to_path(&path, &ctx, &[]).unwrap_err();
    assert!(err.to_string().contains("out.prm"));
}
