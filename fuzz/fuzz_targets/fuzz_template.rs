#![no_main]

use libfuzzer_sys::fuzz_target;
use storypages::render::RenderContext;
use storypages::render::template;

fuzz_target!(|data: &[u8]| {
    if let Ok(source) = std::str::from_utf8(data) {
        for locked in [false, true] {
            let _ = template::execute(source, &RenderContext::new("fuzz", locked));
        }
    }
});
