use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::{RegionFile, Result, REGION_WIDTH};

/// A directory of region files named `r.<x>.<z>.mcr`, addressed by world
/// chunk coordinates.
///
/// Region `(rx, rz)` holds the chunks whose coordinates divided by 32,
/// rounding down, are `(rx, rz)`. So chunk `(-1, 40)` is chunk `(31, 8)` of
/// region `(-1, 1)`.
#[derive(Debug, Clone)]
pub struct RegionDirectory {
    region_dir: PathBuf,
}

impl RegionDirectory {
    pub fn new(region_dir: impl Into<PathBuf>) -> Self {
        Self {
            region_dir: region_dir.into(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.region_dir
    }

    /// Path of the region file at region coordinates `x`, `z`. The file may
    /// not exist.
    pub fn region_path(&self, x: i32, z: i32) -> PathBuf {
        self.region_dir.join(format!("r.{}.{}.mcr", x, z))
    }

    pub fn has_region(&self, x: i32, z: i32) -> bool {
        self.region_path(x, z).exists()
    }

    /// Open the region containing world chunk `cx`, `cz`, returning it with
    /// the chunk's local coordinates inside that region.
    pub fn region_for_chunk(&self, cx: i32, cz: i32) -> Result<(RegionFile, usize, usize)> {
        let ((rx, rz), (x, z)) = chunk_to_region(cx, cz);
        let region = RegionFile::open(self.region_path(rx, rz))?;
        Ok((region, x, z))
    }

    /// Region coordinates of every non-empty region file in the directory,
    /// sorted. A missing directory has no regions.
    pub fn regions(&self) -> Result<Vec<(i32, i32)>> {
        let paths = match fs::read_dir(&self.region_dir) {
            Ok(paths) => paths,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(vec![]),
            Err(e) => return Err(e.into()),
        };

        let mut coords: Vec<_> = paths
            .filter_map(|path| path.ok())
            .map(|path| path.path())
            .filter(|path| path.is_file())
            .filter(|path| path.extension().map_or(false, |ext| ext == "mcr"))
            .filter(|path| fs::metadata(path).map_or(false, |m| m.len() > 0))
            .filter_map(|p| coords_from_region(&p))
            .collect();

        coords.sort_unstable();
        Ok(coords)
    }
}

/// Split world chunk coordinates into region coordinates and the local
/// coordinates within that region.
pub fn chunk_to_region(cx: i32, cz: i32) -> ((i32, i32), (usize, usize)) {
    let width = REGION_WIDTH as i32;
    (
        (cx.div_euclid(width), cz.div_euclid(width)),
        (cx.rem_euclid(width) as usize, cz.rem_euclid(width) as usize),
    )
}

fn coords_from_region(region: &Path) -> Option<(i32, i32)> {
    let filename = region.file_name()?.to_str()?;
    let mut parts = filename.split('.');
    if parts.next()? != "r" {
        return None;
    }
    let x = parts.next()?.parse::<i32>().ok()?;
    let z = parts.next()?.parse::<i32>().ok()?;
    Some((x, z))
}
