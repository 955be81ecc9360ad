#![no_main]

use libfuzzer_sys::fuzz_target;
use quixcc::{CompileJob, JobConfig};

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Raw token stream first, then through the preprocessor.
        let mut raw = CompileJob::new(JobConfig::new().with_preprocess(false).with_fold_constants(true));
        let _ = raw.parse_source(s, "fuzz.q");

        let mut prep = CompileJob::new(JobConfig::new());
        if prep.parse_source(s, "fuzz.q") {
            assert!(prep.ast().is_some());
        }
    }
});
