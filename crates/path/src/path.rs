//! The default path data structure.

use crate::geom::traits::Transformation;
use crate::math::*;
use crate::{Event, PathEvent};

use core::fmt;
use core::iter::{FromIterator, IntoIterator};

use alloc::boxed::Box;
use alloc::vec::Vec;

/// Enumeration corresponding to the [Event](crate::Event) enum without the
/// parameters.
///
/// This is used by the [Path](struct.Path.html) data structure to store path
/// events a tad more efficiently.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub(crate) enum Verb {
    LineTo,
    QuadraticTo,
    CubicTo,
    Begin,
    Close,
    End,
}

/// A simple path data structure.
///
/// # Representation
///
/// Paths contain two buffers:
/// - a buffer of commands (Begin, Line, Quadratic, Cubic, Close or End),
/// - and a buffer of points that can be endpoints or control points.
///
/// The order of storage for points is determined by the sequence of commands.
/// Closing a subpath pushes a copy of the first point so that the closing
/// edge is materialized in the buffer.
#[derive(Clone, Default)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct Path {
    points: Box<[Point]>,
    verbs: Box<[Verb]>,
}

/// A view on a `Path`.
#[derive(Copy, Clone)]
pub struct PathSlice<'l> {
    pub(crate) points: &'l [Point],
    pub(crate) verbs: &'l [Verb],
}

impl Path {
    /// Creates a [Builder](struct.Builder.html) to build a path.
    pub fn builder() -> Builder {
        Builder::new()
    }

    /// Creates an empty `Path`.
    #[inline]
    pub fn new() -> Path {
        Path {
            points: Box::new([]),
            verbs: Box::new([]),
        }
    }

    /// Returns a view on this `Path`.
    #[inline]
    pub fn as_slice(&self) -> PathSlice {
        PathSlice {
            points: &self.points[..],
            verbs: &self.verbs[..],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.verbs.is_empty()
    }

    /// Iterates over the entire `Path`.
    pub fn iter(&self) -> Iter {
        Iter::new(&self.points[..], &self.verbs[..])
    }

    /// Applies a transform to all endpoints and control points of this path
    /// and returns the result.
    pub fn transformed<T: Transformation<f32>>(mut self, transform: &T) -> Self {
        for p in self.points.iter_mut() {
            *p = transform.transform_point(*p);
        }

        self
    }
}

impl FromIterator<PathEvent> for Path {
    fn from_iter<T: IntoIterator<Item = PathEvent>>(iter: T) -> Path {
        let mut builder = Path::builder();
        for event in iter.into_iter() {
            builder.path_event(event);
        }

        builder.build()
    }
}

impl<'l> IntoIterator for &'l Path {
    type Item = PathEvent;
    type IntoIter = Iter<'l>;

    fn into_iter(self) -> Iter<'l> {
        self.iter()
    }
}

impl<'l> From<&'l Path> for PathSlice<'l> {
    fn from(path: &'l Path) -> Self {
        path.as_slice()
    }
}

impl fmt::Debug for Path {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        self.as_slice().fmt(formatter)
    }
}

impl<'l> PathSlice<'l> {
    /// Iterates over the path.
    pub fn iter(&self) -> Iter<'l> {
        Iter::new(self.points, self.verbs)
    }

    pub fn is_empty(&self) -> bool {
        self.verbs.is_empty()
    }
}

impl<'l> fmt::Debug for PathSlice<'l> {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        fn write_point(formatter: &mut fmt::Formatter, point: Point) -> fmt::Result {
            write!(formatter, " ")?;
            fmt::Debug::fmt(&point.x, formatter)?;
            write!(formatter, " ")?;
            fmt::Debug::fmt(&point.y, formatter)
        }

        write!(formatter, "\"")?;

        for evt in self.iter() {
            match evt {
                Event::Begin { at } => {
                    write!(formatter, " M")?;
                    write_point(formatter, at)?;
                }
                Event::End { close, .. } => {
                    if close {
                        write!(formatter, " Z")?;
                    }
                }
                Event::Line { to, .. } => {
                    write!(formatter, " L")?;
                    write_point(formatter, to)?;
                }
                Event::Quadratic { ctrl, to, .. } => {
                    write!(formatter, " Q")?;
                    write_point(formatter, ctrl)?;
                    write_point(formatter, to)?;
                }
                Event::Cubic {
                    ctrl1, ctrl2, to, ..
                } => {
                    write!(formatter, " C")?;
                    write_point(formatter, ctrl1)?;
                    write_point(formatter, ctrl2)?;
                    write_point(formatter, to)?;
                }
            }
        }

        write!(formatter, "\"")
    }
}

impl<'l> IntoIterator for PathSlice<'l> {
    type Item = PathEvent;
    type IntoIter = Iter<'l>;

    fn into_iter(self) -> Iter<'l> {
        self.iter()
    }
}

/// Builds a `Path`.
///
/// Every subpath must be wrapped in a `begin`/`end` (or `begin`/`close`)
/// pair; misuse is caught by debug assertions.
#[derive(Clone, Default)]
pub struct Builder {
    points: Vec<Point>,
    verbs: Vec<Verb>,
    first: Point,
    in_subpath: bool,
}

impl Builder {
    pub fn new() -> Self {
        Builder {
            points: Vec::new(),
            verbs: Vec::new(),
            first: point(0.0, 0.0),
            in_subpath: false,
        }
    }

    pub fn with_capacity(points: usize, edges: usize) -> Self {
        Builder {
            points: Vec::with_capacity(points),
            verbs: Vec::with_capacity(edges),
            first: point(0.0, 0.0),
            in_subpath: false,
        }
    }

    /// Starts a new subpath at `at`.
    pub fn begin(&mut self, at: Point) {
        debug_assert!(!self.in_subpath, "begin() called twice without end()");
        self.in_subpath = true;

        self.first = at;
        self.points.push(at);
        self.verbs.push(Verb::Begin);
    }

    /// Ends the current subpath, optionally closing it with an edge back to
    /// the first point.
    pub fn end(&mut self, close: bool) {
        debug_assert!(self.in_subpath, "end() called without begin()");
        self.in_subpath = false;

        if close {
            self.points.push(self.first);
        }

        self.verbs.push(if close { Verb::Close } else { Verb::End });
    }

    /// Shorthand for `end(true)`.
    #[inline]
    pub fn close(&mut self) {
        self.end(true);
    }

    pub fn line_to(&mut self, to: Point) {
        debug_assert!(self.in_subpath, "edge added before begin()");

        self.points.push(to);
        self.verbs.push(Verb::LineTo);
    }

    pub fn quadratic_bezier_to(&mut self, ctrl: Point, to: Point) {
        debug_assert!(self.in_subpath, "edge added before begin()");

        self.points.push(ctrl);
        self.points.push(to);
        self.verbs.push(Verb::QuadraticTo);
    }

    pub fn cubic_bezier_to(&mut self, ctrl1: Point, ctrl2: Point, to: Point) {
        debug_assert!(self.in_subpath, "edge added before begin()");

        self.points.push(ctrl1);
        self.points.push(ctrl2);
        self.points.push(to);
        self.verbs.push(Verb::CubicTo);
    }

    /// Replays a path event into the builder.
    pub fn path_event(&mut self, event: PathEvent) {
        match event {
            Event::Begin { at } => self.begin(at),
            Event::Line { to, .. } => self.line_to(to),
            Event::Quadratic { ctrl, to, .. } => self.quadratic_bezier_to(ctrl, to),
            Event::Cubic {
                ctrl1, ctrl2, to, ..
            } => self.cubic_bezier_to(ctrl1, ctrl2, to),
            Event::End { close, .. } => self.end(close),
        }
    }

    pub fn reserve(&mut self, endpoints: usize, ctrl_points: usize) {
        self.points.reserve(endpoints + ctrl_points);
        self.verbs.reserve(endpoints);
    }

    pub fn build(self) -> Path {
        debug_assert!(!self.in_subpath, "build() called before end()");
        Path {
            points: self.points.into_boxed_slice(),
            verbs: self.verbs.into_boxed_slice(),
        }
    }
}

/// An iterator of `PathEvent` for `Path` and `PathSlice`.
#[derive(Clone)]
pub struct Iter<'l> {
    points: core::slice::Iter<'l, Point>,
    verbs: core::slice::Iter<'l, Verb>,
    current: Point,
    first: Point,
}

impl<'l> Iter<'l> {
    fn new(points: &'l [Point], verbs: &'l [Verb]) -> Self {
        Iter {
            points: points.iter(),
            verbs: verbs.iter(),
            current: point(0.0, 0.0),
            first: point(0.0, 0.0),
        }
    }

    #[inline]
    fn next_point(&mut self) -> Point {
        *self.points.next().unwrap_or(&point(0.0, 0.0))
    }
}

impl<'l> Iterator for Iter<'l> {
    type Item = PathEvent;

    #[inline]
    fn next(&mut self) -> Option<PathEvent> {
        match self.verbs.next() {
            Some(&Verb::Begin) => {
                self.current = self.next_point();
                self.first = self.current;
                Some(PathEvent::Begin { at: self.current })
            }
            Some(&Verb::LineTo) => {
                let from = self.current;
                self.current = self.next_point();
                Some(PathEvent::Line {
                    from,
                    to: self.current,
                })
            }
            Some(&Verb::QuadraticTo) => {
                let from = self.current;
                let ctrl = self.next_point();
                self.current = self.next_point();
                Some(PathEvent::Quadratic {
                    from,
                    ctrl,
                    to: self.current,
                })
            }
            Some(&Verb::CubicTo) => {
                let from = self.current;
                let ctrl1 = self.next_point();
                let ctrl2 = self.next_point();
                self.current = self.next_point();
                Some(PathEvent::Cubic {
                    from,
                    ctrl1,
                    ctrl2,
                    to: self.current,
                })
            }
            Some(&Verb::Close) => {
                let last = self.current;
                let _ = self.next_point();
                self.current = self.first;
                Some(PathEvent::End {
                    last,
                    first: self.first,
                    close: true,
                })
            }
            Some(&Verb::End) => {
                let last = self.current;
                self.current = self.first;
                Some(PathEvent::End {
                    last,
                    first: self.first,
                    close: false,
                })
            }
            None => None,
        }
    }
}
