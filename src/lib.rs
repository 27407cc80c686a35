//! A multi-layer feedforward classifier trained by mini-batch gradient descent
//! with momentum, built on dense `ndarray` matrices.
//!
//! ```no_run
//! use ann::{config::FitConfig, network::Classifier};
//! use ndarray::arr2;
//!
//! let x = arr2(&[[0.0, 0.1], [0.2, 0.0], [2.0, 2.1], [2.2, 1.9]]);
//! let y = [0, 0, 1, 1];
//! let mut model = Classifier::new(FitConfig::new(vec![4]).epochs(200));
//! model.fit(x.view(), &y)?;
//! let predicted = model.predict(x.view())?;
//! # Ok::<(), ann::error::Error>(())
//! ```

pub mod activation;
pub mod backward;
pub mod config;
pub mod data;
pub mod error;
pub mod forward;
pub mod loss;
pub mod metrics;
pub mod network;
pub mod params;
pub mod utils;

pub use error::{Error, Result};

#[macro_export]
macro_rules! assert_rel_eq_arr1 {
    ($actual:expr, $expected:expr $(, $opt:ident = $val:expr)*) => {
        assert_eq!($actual.shape(), $expected.shape());
        ndarray::Zip::from(&$actual)
            .and(&$expected)
            .for_each(|v, w| {
                assert_relative_eq!(v, w $(, $opt = $val)*);
            });
    };
}

#[macro_export]
macro_rules! assert_rel_eq_arr2 {
    ($actual:expr, $expected:expr $(, $opt:ident = $val:expr)*) => {
        assert_eq!($actual.shape(), $expected.shape());
        ndarray::Zip::from(&$actual)
            .and(&$expected)
            .for_each(|v, w| {
                assert_relative_eq!(v, w $(, $opt = $val)*);
            });
    };
}
