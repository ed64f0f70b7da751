pub use crate::error::{Error, Result};
pub use image::{imageops::FilterType, ImageError, RgbImage};
pub use indexmap::{IndexMap, IndexSet};
pub use itertools::Itertools as _;
pub use log::{debug, info, warn};
pub use ndarray::{Array1, Array3, ArrayView1, Axis};
pub use rand::prelude::*;
pub use serde::{Deserialize, Serialize};
pub use std::{
    fmt::{self, Debug},
    fs, io,
    iter::FusedIterator,
    marker::PhantomData,
    path::{Path, PathBuf},
    sync::Arc,
};
