use std::path::PathBuf;

use armory_content::ContentFactory;
use armory_core::{ArmorSetOracle, ItemHandle, SetId};

fn data_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../../data")
}

#[test]
fn bundled_content_is_valid() {
    let factory = ContentFactory::new(data_dir());

    let catalog = factory.load_catalog().unwrap();
    let config = factory.load_config().unwrap();

    assert_eq!(catalog.set_count(), 2);
    let warden = catalog.set(SetId(1)).unwrap();
    assert_eq!(warden.completion_threshold(), 4);
    assert!(catalog.item(ItemHandle(10)).unwrap().armor().is_some());
    assert_eq!(config.equipment.len(), 14);
    assert_eq!(config.max_carry_weight, Some(60.0));
}
