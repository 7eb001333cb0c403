use std::sync::Once;

pub(crate) trait TestHelper {
    fn assert_approx_eq<const N: usize>(&self, expected: [f64; N]);
}

impl TestHelper for [f64] {
    fn assert_approx_eq<const N: usize>(&self, expected: [f64; N]) {
        assert_eq!(self.len(), N, "{self:?} vs {expected:?}");
        for (a, b) in self.iter().zip(expected) {
            assert!((a - b).abs() < 1e-9, "{self:?} vs {expected:?}");
        }
    }
}

impl<const M: usize> TestHelper for [f64; M] {
    fn assert_approx_eq<const N: usize>(&self, expected: [f64; N]) {
        self.as_slice().assert_approx_eq(expected)
    }
}

impl TestHelper for Vec<f64> {
    fn assert_approx_eq<const N: usize>(&self, expected: [f64; N]) {
        self.as_slice().assert_approx_eq(expected)
    }
}

static LOGGER: Once = Once::new();

/// Route `log` output to stderr at debug level; safe to call from every test.
pub(crate) fn init_logger() {
    LOGGER.call_once(|| {
        let _ = fern::Dispatch::new()
            .format(|out, message, record| {
                out.finish(format_args!("[{} {}] {}", record.level(), record.target(), message))
            })
            .level(log::LevelFilter::Debug)
            .chain(std::io::stderr())
            .apply();
    });
}
