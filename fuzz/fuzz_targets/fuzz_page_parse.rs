#![no_main]

use libfuzzer_sys::fuzz_target;
use storypages::lock::LockRule;
use storypages::page::{Page, PageRequest, build_view};

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes through the whole request flow must never panic
    let Ok(page) = Page::from_reader(data) else {
        return;
    };
    let _ = page.meta();
    let _ = page.content("fuzz", false);
    let _ = page.content("fuzz", true);

    let request = PageRequest::from_header("fuzz", "key=gold; note=torn");
    let _ = build_view(&page, &request, LockRule::FirstUsed);
    let _ = build_view(&page, &request, LockRule::AnyUsed);
});
