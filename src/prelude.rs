#![allow(unused_imports)]

pub use anyhow::{Context as _, Result, anyhow, bail};
pub use std::sync::{Arc, LazyLock, Mutex, OnceLock};

pub use async_trait::async_trait;
pub use futures::prelude::*;
pub use futures::stream::BoxStream;
pub use serde::{Deserialize, Serialize};

pub use log::{debug, error, info, trace, warn};
