//! Integration tests for the tile atlas cache.

use macroquad::prelude::{Image, BLACK};
use massacre::TileCache;
use std::rc::Rc;

#[test]
fn test_repeated_lookups_share_one_table() {
    let mut cache = TileCache::new(24, 32);
    let first = cache.get("missing-atlas.png");
    let second = cache.get("missing-atlas.png");
    let third = cache.get("missing-atlas.png");

    assert!(Rc::ptr_eq(&first, &second));
    assert!(Rc::ptr_eq(&second, &third));
}

#[test]
fn test_distinct_files_get_distinct_tables() {
    let mut cache = TileCache::new(24, 32);
    let a = cache.get("missing-a.png");
    let b = cache.get("missing-b.png");
    assert!(!Rc::ptr_eq(&a, &b));
}

#[test]
fn test_load_failure_substitutes_placeholder() {
    // A file that cannot be read never raises past the cache boundary;
    // the caller gets a usable table.
    let mut cache = TileCache::new(32, 32);
    let table = cache.get("does-not-exist-anywhere.png");
    assert!(table.columns() > 0);
    assert!(table.rows() > 0);
    assert_eq!(table.tile_size(), (32, 32));
}

#[test]
fn test_real_atlas_is_sliced_to_grid() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("atlas.png");
    let path = path.to_str().expect("utf-8 temp path");

    // A 96x160 image slices into a 4x5 grid of 24x32 tiles.
    let image = Image::gen_image_color(96, 160, BLACK);
    image.export_png(path);

    let mut cache = TileCache::new(24, 32);
    let table = cache.get(path);
    assert_eq!(table.columns(), 4);
    assert_eq!(table.rows(), 5);

    let again = cache.get(path);
    assert!(Rc::ptr_eq(&table, &again));
}
