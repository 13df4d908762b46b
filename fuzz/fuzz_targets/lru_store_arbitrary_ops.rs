#![no_main]

use libfuzzer_sys::fuzz_target;
use lrukit::store::lru::LruStore;

// Fuzz arbitrary operation sequences on LruStore
//
// Drives insert, get, peek, pop_lru, set_capacity and clear from the input
// bytes and checks the structural invariants after every step.
fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    // First byte picks the capacity (1-64)
    let capacity = (data[0] as usize) % 64 + 1;
    let mut store: LruStore<u8, u32> = match LruStore::try_new(capacity) {
        Ok(store) => store,
        Err(_) => return,
    };

    let mut idx = 1;
    while idx + 1 < data.len() {
        let op = data[idx] % 6;
        let key = data[idx + 1];

        match op {
            0 | 1 => {
                let was_present = store.contains(&key);
                let len_before = store.len();
                store.insert(key, u32::from(key));
                if was_present {
                    assert_eq!(store.len(), len_before);
                }
                assert_eq!(store.keys_mru().first(), Some(&key));
            }
            2 => {
                if store.get(&key).is_some() {
                    assert_eq!(store.keys_mru().first(), Some(&key));
                }
            }
            3 => {
                let order = store.keys_mru();
                let _ = store.peek(&key);
                assert_eq!(store.keys_mru(), order);
            }
            4 => {
                let expected = store.peek_lru().map(|(k, _)| *k);
                assert_eq!(store.pop_lru().map(|e| *e.key()), expected);
            }
            5 => {
                if key % 16 == 0 {
                    store.clear();
                    assert!(store.is_empty());
                } else if let Some(capacity) = std::num::NonZeroUsize::new(usize::from(key % 64)) {
                    store.set_capacity(capacity);
                }
            }
            _ => unreachable!(),
        }

        store.debug_validate_invariants();
        assert!(store.len() <= store.capacity());

        idx += 2;
    }
});
