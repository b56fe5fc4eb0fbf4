use std::fs;

use crate::{chunk_to_region, RegionDirectory};

#[test]
fn chunk_coordinates_split_into_regions() {
    assert_eq!(chunk_to_region(0, 0), ((0, 0), (0, 0)));
    assert_eq!(chunk_to_region(31, 32), ((0, 1), (31, 0)));
    assert_eq!(chunk_to_region(-1, 40), ((-1, 1), (31, 8)));
    assert_eq!(chunk_to_region(-32, -33), ((-1, -2), (0, 31)));
}

#[test]
fn region_paths() {
    let dir = RegionDirectory::new("world/region");
    assert_eq!(
        dir.region_path(-1, 2),
        std::path::Path::new("world/region").join("r.-1.2.mcr")
    );
}

#[test]
fn region_for_chunk_opens_the_right_file() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = RegionDirectory::new(tmp.path());

    let (mut region, x, z) = dir.region_for_chunk(-1, 40).unwrap();
    assert_eq!((x, z), (31, 8));
    assert!(!dir.has_region(-1, 1));

    region.store_chunk(x, z, b"data").unwrap();
    assert!(dir.has_region(-1, 1));
    assert_eq!(region.path(), dir.region_path(-1, 1).as_path());
}

#[test]
fn lists_regions_on_disk() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = RegionDirectory::new(tmp.path());
    assert!(dir.regions().unwrap().is_empty());

    for &(cx, cz) in &[(0, 0), (40, -5), (-100, 3)] {
        let (mut region, x, z) = dir.region_for_chunk(cx, cz).unwrap();
        region.store_chunk(x, z, b"c").unwrap();
    }

    // ignored: empty, wrong extension, not a region name.
    fs::write(tmp.path().join("r.9.9.mcr"), b"").unwrap();
    fs::write(tmp.path().join("r.5.5.mca"), b"x").unwrap();
    fs::write(tmp.path().join("level.mcr"), b"x").unwrap();

    assert_eq!(dir.regions().unwrap(), vec![(-4, 0), (0, 0), (1, -1)]);
}

#[test]
fn missing_directory_has_no_regions() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = RegionDirectory::new(tmp.path().join("nope"));
    assert!(dir.regions().unwrap().is_empty());
}
