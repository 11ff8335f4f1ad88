use crate::noise_gen::NoiseError;

/// Scalar noise field, values in [0,1) once normalized.
pub type NoiseGrid = Grid<f32>;

/// 8-bit greyscale image of the same shape as the noise it came from.
pub type ByteGrid = Grid<u8>;

/// Row-major 2D buffer addressed by `(x, y)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid<T> {
    width: usize,
    height: usize,
    data: Vec<T>,
}

impl<T: Clone + Default> Grid<T> {
    pub fn new(width: usize, height: usize) -> Result<Self, NoiseError> {
        Self::filled(width, height, T::default())
    }
}

impl<T: Clone> Grid<T> {
    pub fn filled(width: usize, height: usize, value: T) -> Result<Self, NoiseError> {
        check_dimensions(width, height)?;
        Ok(Self { width, height, data: vec![value; width * height] })
    }
}

impl<T> Grid<T> {
    /// Wraps an existing row-major buffer. The length must be `width * height`.
    pub fn from_vec(width: usize, height: usize, data: Vec<T>) -> Result<Self, NoiseError> {
        check_dimensions(width, height)?;
        if data.len() != width * height {
            return Err(NoiseError::BufferSizeMismatch {
                expected: width * height,
                actual: data.len(),
            });
        }
        Ok(Self { width, height, data })
    }

    /// Builds a grid by evaluating `f(x, y)` for every cell.
    pub fn from_fn<F>(width: usize, height: usize, mut f: F) -> Result<Self, NoiseError>
    where
        F: FnMut(usize, usize) -> T,
    {
        check_dimensions(width, height)?;
        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Ok(Self { width, height, data })
    }

    #[inline]
    pub fn width(&self) -> usize { self.width }

    #[inline]
    pub fn height(&self) -> usize { self.height }

    #[inline]
    pub fn len(&self) -> usize { self.data.len() }

    #[inline]
    pub fn is_empty(&self) -> bool { self.data.is_empty() }

    #[inline]
    pub fn in_bounds(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    #[inline]
    fn idx(&self, x: usize, y: usize) -> usize { y * self.width + x }

    pub fn get(&self, x: usize, y: usize) -> Option<&T> {
        if self.in_bounds(x, y) { self.data.get(self.idx(x, y)) } else { None }
    }

    pub fn get_mut(&mut self, x: usize, y: usize) -> Option<&mut T> {
        if self.in_bounds(x, y) {
            let i = self.idx(x, y);
            self.data.get_mut(i)
        } else {
            None
        }
    }

    /// Writes `value` at `(x, y)`. Returns false when the cell is out of bounds.
    pub fn set(&mut self, x: usize, y: usize, value: T) -> bool {
        match self.get_mut(x, y) {
            Some(cell) => {
                *cell = value;
                true
            }
            None => false,
        }
    }

    pub fn as_slice(&self) -> &[T] { &self.data }

    pub fn as_mut_slice(&mut self) -> &mut [T] { &mut self.data }

    pub fn into_vec(self) -> Vec<T> { self.data }

    pub fn iter(&self) -> std::slice::Iter<'_, T> { self.data.iter() }

    /// Applies `f` to every cell, keeping the shape.
    pub fn map<U, F>(&self, f: F) -> Grid<U>
    where
        F: FnMut(&T) -> U,
    {
        Grid {
            width: self.width,
            height: self.height,
            data: self.data.iter().map(f).collect(),
        }
    }
}

impl Grid<f32> {
    /// Smallest and largest value in the grid.
    pub fn value_range(&self) -> (f32, f32) {
        self.data.iter().fold((f32::INFINITY, f32::NEG_INFINITY), |(min, max), &v| {
            (min.min(v), max.max(v))
        })
    }
}

impl<T> std::ops::Index<(usize, usize)> for Grid<T> {
    type Output = T;

    fn index(&self, (x, y): (usize, usize)) -> &T {
        assert!(self.in_bounds(x, y), "grid index ({}, {}) out of bounds for {}x{}", x, y, self.width, self.height);
        &self.data[self.idx(x, y)]
    }
}

impl<T> std::ops::IndexMut<(usize, usize)> for Grid<T> {
    fn index_mut(&mut self, (x, y): (usize, usize)) -> &mut T {
        assert!(self.in_bounds(x, y), "grid index ({}, {}) out of bounds for {}x{}", x, y, self.width, self.height);
        let i = self.idx(x, y);
        &mut self.data[i]
    }
}

pub(crate) fn check_dimensions(width: usize, height: usize) -> Result<(), NoiseError> {
    if width == 0 || height == 0 || width.checked_mul(height).is_none() {
        return Err(NoiseError::InvalidDimensions { width, height });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_dimensions_rejected() {
        assert!(matches!(
            NoiseGrid::new(0, 4),
            Err(NoiseError::InvalidDimensions { width: 0, height: 4 })
        ));
        assert!(NoiseGrid::new(4, 0).is_err());
        assert!(ByteGrid::filled(0, 0, 7).is_err());
    }

    #[test]
    fn test_from_vec_checks_length() {
        let err = Grid::from_vec(3, 2, vec![0u8; 5]).unwrap_err();
        assert!(matches!(err, NoiseError::BufferSizeMismatch { expected: 6, actual: 5 }));

        let grid = Grid::from_vec(3, 2, vec![1, 2, 3, 4, 5, 6]).unwrap();
        assert_eq!(grid[(2, 0)], 3);
        assert_eq!(grid[(0, 1)], 4);
    }

    #[test]
    fn test_bounds_checked_access() {
        let mut grid = NoiseGrid::new(4, 3).unwrap();
        assert!(grid.set(3, 2, 0.25));
        assert_eq!(grid.get(3, 2), Some(&0.25));
        assert_eq!(grid.get(4, 0), None);
        assert_eq!(grid.get(0, 3), None);
        assert!(!grid.set(4, 2, 1.0));
    }

    #[test]
    fn test_from_fn_row_major() {
        let grid = Grid::from_fn(3, 2, |x, y| (x, y)).unwrap();
        assert_eq!(grid.as_slice()[1], (1, 0));
        assert_eq!(grid.as_slice()[3], (0, 1));
        assert_eq!(grid.len(), 6);
    }

    #[test]
    #[should_panic]
    fn test_index_out_of_bounds_panics() {
        let grid = NoiseGrid::new(2, 2).unwrap();
        let _ = grid[(2, 0)];
    }

    #[test]
    fn test_value_range() {
        let grid = Grid::from_vec(2, 2, vec![0.5, -1.0, 2.0, 0.0]).unwrap();
        assert_eq!(grid.value_range(), (-1.0, 2.0));
    }
}
