#![no_main]
use covgate::parsers::Parser;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Neither parsing nor validation may panic.
    if let Ok(parsed) = covgate::parsers::cobertura::CoberturaParser.parse(data) {
        if let Ok(model) = covgate::model::CoverageModel::new(parsed) {
            let _ = covgate::summary::analyze(&model);
        }
    }
});
