use datacart::{
    storage::{FileStorage, MemoryStorage, Storage},
    CartEntry, DataCart, DownloadStatus, DEFAULT_CART, DOWNLOAD_CART,
};
use tempfile::tempdir;

#[test]
fn open_initializes_an_absent_slot() {
    let store = MemoryStorage::new();
    assert!(!DataCart::exists("new-slot", &store));

    let cart = DataCart::open("new-slot", store.clone());

    assert_eq!(0, cart.len());
    assert_eq!(Some("{}".to_string()), store.get_item("new-slot"));
    assert!(DataCart::exists("new-slot", &store));
}

#[test]
fn create_discards_prior_contents() {
    let store = MemoryStorage::new();
    let mut cart = DataCart::create(DEFAULT_CART, store.clone());
    cart.add_item(CartEntry::new("gurn", "goober"));

    let cart = DataCart::create(DEFAULT_CART, store.clone());

    assert_eq!(0, cart.len());
    assert_eq!(Some("{}".to_string()), store.get_item(DEFAULT_CART));
}

#[test]
fn forget_clears_storage_but_not_memory() {
    let store = MemoryStorage::new();
    let mut cart = DataCart::create(DEFAULT_CART, store.clone());
    cart.add_item(CartEntry::new("gurn", "goober"));

    cart.forget();
    assert_eq!(None, store.get_item(DEFAULT_CART));
    assert_eq!(1, cart.len());

    cart.save();
    let persisted = store.get_item(DEFAULT_CART).expect("slot restored");
    assert!(persisted.contains("goober"));
}

#[test]
fn cart_lifecycle_end_to_end() {
    let store = MemoryStorage::new();

    let mut cart = DataCart::create(DEFAULT_CART, store.clone());
    cart.add_item(CartEntry::with_url("gurn", "goober", "http://x"));
    assert_eq!(1, cart.len());

    assert!(cart.mark_downloaded("gurn", "goober", true));
    assert_eq!(1, cart.count_downloaded());

    cart.forget();

    let cart = DataCart::open(DEFAULT_CART, store.clone());
    assert_eq!(0, cart.len());
}

#[test]
fn status_reconciliation_between_carts() {
    let store_a = MemoryStorage::new();
    let store_b = MemoryStorage::new();

    let mut a = DataCart::create("cart", store_a);
    a.add_item(CartEntry::new("r1", "goober"));
    a.mark_downloaded("r1", "goober", true);

    let mut b = DataCart::create("listing", store_b);
    b.add_item(CartEntry::new("r1", "goober"));
    b.add_item(CartEntry::new("r1", "gary"));

    assert_eq!(1, a.update_status_of(&mut b, true));

    assert!(b.find_item("r1", "goober").unwrap().is_downloaded());
    assert!(b.find_item("r1", "goober").unwrap().in_cart);
    assert!(!b.find_item("r1", "gary").unwrap().is_downloaded());
    assert!(!b.find_item("r1", "gary").unwrap().in_cart);

    assert_eq!(1, a.len());
    assert_eq!(1, a.count_downloaded());
}

#[test]
fn stale_mirror_catches_up_on_reload() {
    let store = MemoryStorage::new();

    let mut writer = DataCart::create(DEFAULT_CART, store.clone());
    let mut reader = DataCart::open(DEFAULT_CART, store.clone());

    writer.add_item(CartEntry::new("gurn", "goober"));

    // the other window sees nothing until it reloads
    assert_eq!(0, reader.len());
    reader.restore();
    assert_eq!(1, reader.len());
}

#[test]
fn mutations_pick_up_concurrent_writes() {
    let store = MemoryStorage::new();

    let mut window_a = DataCart::create(DEFAULT_CART, store.clone());
    let mut window_b = DataCart::open(DEFAULT_CART, store.clone());

    window_a.add_item(CartEntry::new("gurn", "goober"));
    window_b.add_item(CartEntry::new("gurn", "gary"));

    // b reloaded before applying, so a's entry survived the second write
    assert_eq!(2, window_b.len());

    window_a.restore();
    assert_eq!(2, window_a.len());
    assert!(window_a.find_item("gurn", "gary").is_some());
}

#[test]
fn malformed_slot_content_heals_to_empty() {
    let store = MemoryStorage::new();
    store.set_item(DEFAULT_CART, "not a cart blob");

    let cart = DataCart::open(DEFAULT_CART, store.clone());
    assert_eq!(0, cart.len());
}

#[test]
fn carts_persist_across_file_store_handles() {
    let dir = tempdir().expect("tmp");

    let mut cart = DataCart::create(
        DEFAULT_CART,
        FileStorage::new(dir.path()).expect("store"),
    );
    let mut entry = CartEntry::with_url("gurn", "goober", "http://x");
    entry.download_status = DownloadStatus::Downloaded;
    cart.add_item(entry);

    // a second process opens the same directory
    let cart = DataCart::open(
        DEFAULT_CART,
        FileStorage::new(dir.path()).expect("second handle"),
    );

    assert_eq!(1, cart.len());
    assert_eq!(1, cart.count_downloaded());
    assert_eq!(
        Some("http://x".to_string()),
        cart.find_item("gurn", "goober").unwrap().download_url.clone()
    );
}

#[test]
fn separate_slots_stay_independent() {
    let store = MemoryStorage::new();

    let mut cart = DataCart::create(DEFAULT_CART, store.clone());
    cart.add_item(CartEntry::new("gurn", "goober"));

    let download = DataCart::create(DOWNLOAD_CART, store.clone());

    assert_eq!(0, download.len());
    assert_eq!(1, DataCart::open(DEFAULT_CART, store.clone()).len());
}
