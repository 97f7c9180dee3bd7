//! Per-vertex value maps.
//!
//! # Overview
//!
//! A [`GraphState`] assigns one value to every vertex of a graph. Scoring
//! algorithms produce a fresh state per iteration and never edit an older
//! one in place, which is what lets the fixed-point engine keep a history
//! of past states and compare them for periodicity.
//!
//! States share their vertex numbering through an `Arc<VertexIndex>`, so a
//! state is a single `Vec<T>` plus a pointer; states built from the same
//! snapshot compare their shapes by pointer.
//!
//! # Equality
//!
//! `==` is exact: two states are equal iff they cover the same vertices and
//! every value is bit-identical ([`StateValue::exact_eq`]). For floats this
//! means `0.0 != -0.0` and a NaN equals the same NaN.

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Add, Index, Sub};
use std::sync::Arc;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::error::{GraphError, Result};
use crate::graph::{Graph, Vertex, VertexIndex};

// ---------------------------------------------------------------------------
// Value traits
// ---------------------------------------------------------------------------

/// A value that can be stored in a [`GraphState`] and compared exactly.
pub trait StateValue: Copy + fmt::Debug {
    /// Bit-exact equality.
    fn exact_eq(&self, other: &Self) -> bool;

    /// Feed the exact representation into `state`; consistent with
    /// [`StateValue::exact_eq`].
    fn hash_exact<H: Hasher>(&self, state: &mut H);
}

macro_rules! float_state_value {
    ($($t:ty),*) => {$(
        impl StateValue for $t {
            fn exact_eq(&self, other: &Self) -> bool {
                self.to_bits() == other.to_bits()
            }

            fn hash_exact<H: Hasher>(&self, state: &mut H) {
                self.to_bits().hash(state);
            }
        }
    )*};
}

macro_rules! int_state_value {
    ($($t:ty),*) => {$(
        impl StateValue for $t {
            fn exact_eq(&self, other: &Self) -> bool {
                self == other
            }

            fn hash_exact<H: Hasher>(&self, state: &mut H) {
                self.hash(state);
            }
        }
    )*};
}

float_state_value!(f32, f64);
int_state_value!(i32, i64, u32, u64, usize, bool);

/// Values supporting the arithmetic and aggregate operations.
pub trait Numeric: StateValue + PartialOrd + Add<Output = Self> + Sub<Output = Self> {
    const ZERO: Self;

    /// Absolute value.
    #[must_use]
    fn magnitude(self) -> Self;

    fn as_f64(self) -> f64;
}

impl Numeric for f64 {
    const ZERO: Self = 0.0;

    fn magnitude(self) -> Self {
        self.abs()
    }

    fn as_f64(self) -> f64 {
        self
    }
}

impl Numeric for f32 {
    const ZERO: Self = 0.0;

    fn magnitude(self) -> Self {
        self.abs()
    }

    fn as_f64(self) -> f64 {
        f64::from(self)
    }
}

impl Numeric for i32 {
    const ZERO: Self = 0;

    fn magnitude(self) -> Self {
        self.saturating_abs()
    }

    fn as_f64(self) -> f64 {
        f64::from(self)
    }
}

impl Numeric for i64 {
    const ZERO: Self = 0;

    fn magnitude(self) -> Self {
        self.saturating_abs()
    }

    fn as_f64(self) -> f64 {
        self as f64
    }
}

// ---------------------------------------------------------------------------
// GraphState
// ---------------------------------------------------------------------------

/// A total map from the vertices of a graph to values of type `T`.
#[derive(Debug, Clone)]
pub struct GraphState<V, T> {
    index: Arc<VertexIndex<V>>,
    values: Vec<T>,
}

impl<V: Vertex, T> GraphState<V, T> {
    /// Every vertex of `graph` mapped to `value`.
    #[must_use]
    pub fn uniform<E>(graph: &Graph<V, E>, value: T) -> Self
    where
        T: Clone,
    {
        let index = graph.vertex_index();
        let values = vec![value; index.len()];
        Self {
            index: Arc::new(index),
            values,
        }
    }

    /// Every vertex of `graph` mapped through `f`, in vertex order.
    #[must_use]
    pub fn from_fn<E, F>(graph: &Graph<V, E>, f: F) -> Self
    where
        F: FnMut(&V) -> T,
    {
        let index = graph.vertex_index();
        let values = index.iter().map(f).collect();
        Self {
            index: Arc::new(index),
            values,
        }
    }

    /// Attach `values` (one per position) to an existing numbering.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::ShapeMismatch`] if the lengths differ.
    pub fn with_values(index: Arc<VertexIndex<V>>, values: Vec<T>) -> Result<Self> {
        if index.len() != values.len() {
            return Err(GraphError::ShapeMismatch);
        }
        Ok(Self { index, values })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[must_use]
    pub const fn index(&self) -> &Arc<VertexIndex<V>> {
        &self.index
    }

    #[must_use]
    pub fn get(&self, v: &V) -> Option<&T> {
        self.index.position(v).map(|i| &self.values[i])
    }

    /// Values by dense position (ascending vertex order).
    #[must_use]
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// `(vertex, value)` pairs in ascending vertex order.
    pub fn iter(&self) -> impl Iterator<Item = (&V, &T)> {
        self.index.iter().zip(self.values.iter())
    }

    /// `true` when both states number the same vertex set.
    #[must_use]
    pub fn same_shape<U>(&self, other: &GraphState<V, U>) -> bool {
        Arc::ptr_eq(&self.index, &other.index) || *self.index == *other.index
    }

    /// `true` when this state has exactly the vertices of `graph`.
    #[must_use]
    pub fn covers<E>(&self, graph: &Graph<V, E>) -> bool {
        self.len() == graph.vertex_count() && graph.vertices().all(|v| self.index.contains(v))
    }

    #[must_use]
    pub fn map<U, F>(&self, mut f: F) -> GraphState<V, U>
    where
        F: FnMut(&T) -> U,
    {
        GraphState {
            index: Arc::clone(&self.index),
            values: self.values.iter().map(|x| f(x)).collect(),
        }
    }

    /// Combine two states vertex by vertex.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::ShapeMismatch`] if the vertex sets differ.
    pub fn zip_with<U, W, F>(&self, other: &GraphState<V, U>, mut f: F) -> Result<GraphState<V, W>>
    where
        F: FnMut(&T, &U) -> W,
    {
        if !self.same_shape(other) {
            return Err(GraphError::ShapeMismatch);
        }
        Ok(GraphState {
            index: Arc::clone(&self.index),
            values: self
                .values
                .iter()
                .zip(other.values.iter())
                .map(|(a, b)| f(a, b))
                .collect(),
        })
    }

    fn positions_of<'a, I>(&self, subset: I) -> Result<Vec<usize>>
    where
        I: IntoIterator<Item = &'a V>,
        V: 'a,
    {
        subset
            .into_iter()
            .map(|v| {
                self.index
                    .position(v)
                    .ok_or_else(|| GraphError::unknown_vertex(v))
            })
            .collect()
    }
}

impl<V: Vertex, T: StateValue> GraphState<V, T> {
    /// Hash over the exact value bits; equal states have equal fingerprints.
    #[must_use]
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.values.len().hash(&mut hasher);
        for value in &self.values {
            value.hash_exact(&mut hasher);
        }
        hasher.finish()
    }
}

impl<V: Vertex, T: Numeric> GraphState<V, T> {
    /// Elementwise `self - other`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::ShapeMismatch`] if the vertex sets differ.
    pub fn subtract(&self, other: &Self) -> Result<Self> {
        self.zip_with(other, |a, b| *a - *b)
    }

    /// Elementwise absolute value.
    #[must_use]
    pub fn abs(&self) -> Self {
        self.map(|x| x.magnitude())
    }

    #[must_use]
    pub fn sum(&self) -> T {
        self.values.iter().fold(T::ZERO, |acc, &x| acc + x)
    }

    /// Arithmetic mean, `None` for an empty state.
    #[must_use]
    pub fn average(&self) -> Option<f64> {
        if self.values.is_empty() {
            return None;
        }
        Some(self.sum().as_f64() / self.values.len() as f64)
    }

    #[must_use]
    pub fn max(&self) -> Option<T> {
        extreme(self.values.iter().copied(), |x, best| x > best)
    }

    #[must_use]
    pub fn min(&self) -> Option<T> {
        extreme(self.values.iter().copied(), |x, best| x < best)
    }

    /// Maximum over `subset` only.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownVertex`] if `subset` names a vertex the
    /// state does not cover.
    pub fn max_over<'a, I>(&self, subset: I) -> Result<Option<T>>
    where
        I: IntoIterator<Item = &'a V>,
        V: 'a,
    {
        let positions = self.positions_of(subset)?;
        Ok(extreme(positions.into_iter().map(|i| self.values[i]), |x, best| x > best))
    }

    /// Minimum over `subset` only.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownVertex`] if `subset` names a vertex the
    /// state does not cover.
    pub fn min_over<'a, I>(&self, subset: I) -> Result<Option<T>>
    where
        I: IntoIterator<Item = &'a V>,
        V: 'a,
    {
        let positions = self.positions_of(subset)?;
        Ok(extreme(positions.into_iter().map(|i| self.values[i]), |x, best| x < best))
    }

    /// `max |self[v] - other[v]|`, or `0.0` for empty states.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::ShapeMismatch`] if the vertex sets differ.
    pub fn max_abs_diff(&self, other: &Self) -> Result<f64> {
        if !self.same_shape(other) {
            return Err(GraphError::ShapeMismatch);
        }
        Ok(self
            .values
            .iter()
            .zip(other.values.iter())
            .map(|(&a, &b)| (a - b).magnitude().as_f64())
            .fold(0.0, f64::max))
    }
}

fn extreme<T, I, F>(values: I, better: F) -> Option<T>
where
    T: Copy,
    I: Iterator<Item = T>,
    F: Fn(T, T) -> bool,
{
    values.fold(None, |best, x| match best {
        Some(b) if !better(x, b) => Some(b),
        _ => Some(x),
    })
}

impl<V: Vertex, T: StateValue> PartialEq for GraphState<V, T> {
    fn eq(&self, other: &Self) -> bool {
        self.same_shape(other)
            && self
                .values
                .iter()
                .zip(other.values.iter())
                .all(|(a, b)| a.exact_eq(b))
    }
}

impl<V: Vertex, T> Index<&V> for GraphState<V, T> {
    type Output = T;

    fn index(&self, v: &V) -> &T {
        match self.get(v) {
            Some(value) => value,
            None => panic!("vertex {v:?} is not covered by this state"),
        }
    }
}

impl<V: Vertex + Serialize, T: Serialize> Serialize for GraphState<V, T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (v, value) in self.index.vertices().iter().zip(self.values.iter()) {
            map.serialize_entry(v, value)?;
        }
        map.end()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
