//! Field-wise addition and subtraction for statistics records.
//!
//! [`FieldOps`] is implemented for every field type a record may hold; the
//! [`stats_algebra!`] macro then derives `Add`/`Sub` (by value and by
//! reference) and `FieldOps` for a record from its field list.
//!
//! | Field type         | `a + b` / `a - b`                                 |
//! |--------------------|---------------------------------------------------|
//! | `f64`, `u32`       | arithmetic                                        |
//! | `[T; N]`           | element-wise                                      |
//! | `Vec<T>`           | element-wise, shorter side padded with defaults   |
//! | `Option<Id>`       | kept when both sides agree, otherwise `None`      |

/// Combine two values of the same field.
pub trait FieldOps: Sized {
    fn field_add(&self, rhs: &Self) -> Self;
    fn field_sub(&self, rhs: &Self) -> Self;
}

impl FieldOps for f64 {
    #[inline]
    fn field_add(&self, rhs: &Self) -> Self {
        self + rhs
    }
    #[inline]
    fn field_sub(&self, rhs: &Self) -> Self {
        self - rhs
    }
}

impl FieldOps for u32 {
    #[inline]
    fn field_add(&self, rhs: &Self) -> Self {
        self + rhs
    }
    #[inline]
    fn field_sub(&self, rhs: &Self) -> Self {
        self - rhs
    }
}

impl<T: FieldOps, const N: usize> FieldOps for [T; N] {
    fn field_add(&self, rhs: &Self) -> Self {
        std::array::from_fn(|i| self[i].field_add(&rhs[i]))
    }
    fn field_sub(&self, rhs: &Self) -> Self {
        std::array::from_fn(|i| self[i].field_sub(&rhs[i]))
    }
}

fn zip_padded<T, F>(a: &[T], b: &[T], f: F) -> Vec<T>
where
    T: FieldOps + Default,
    F: Fn(&T, &T) -> T,
{
    let zero = T::default();
    (0..a.len().max(b.len()))
        .map(|i| f(a.get(i).unwrap_or(&zero), b.get(i).unwrap_or(&zero)))
        .collect()
}

impl<T: FieldOps + Default> FieldOps for Vec<T> {
    fn field_add(&self, rhs: &Self) -> Self {
        zip_padded(self, rhs, T::field_add)
    }
    fn field_sub(&self, rhs: &Self) -> Self {
        zip_padded(self, rhs, T::field_sub)
    }
}

/// Index fields: an aggregate over different entities has no index.
impl<T: Copy + Eq> FieldOps for Option<T> {
    #[inline]
    fn field_add(&self, rhs: &Self) -> Self {
        if self == rhs { *self } else { None }
    }
    #[inline]
    fn field_sub(&self, rhs: &Self) -> Self {
        self.field_add(rhs)
    }
}

/// Derive `FieldOps`, `Add` and `Sub` for a record from its field list.
///
/// Every listed field must implement [`FieldOps`]; every field of the record
/// must be listed.
#[macro_export]
macro_rules! stats_algebra {
    ($ty:ident { $($field:ident),+ $(,)? }) => {
        impl $crate::FieldOps for $ty {
            fn field_add(&self, rhs: &Self) -> Self {
                $ty { $($field: $crate::FieldOps::field_add(&self.$field, &rhs.$field)),+ }
            }
            fn field_sub(&self, rhs: &Self) -> Self {
                $ty { $($field: $crate::FieldOps::field_sub(&self.$field, &rhs.$field)),+ }
            }
        }

        impl std::ops::Add for &$ty {
            type Output = $ty;
            fn add(self, rhs: Self) -> $ty {
                $crate::FieldOps::field_add(self, rhs)
            }
        }

        impl std::ops::Sub for &$ty {
            type Output = $ty;
            fn sub(self, rhs: Self) -> $ty {
                $crate::FieldOps::field_sub(self, rhs)
            }
        }

        impl std::ops::Add for $ty {
            type Output = $ty;
            fn add(self, rhs: Self) -> $ty {
                &self + &rhs
            }
        }

        impl std::ops::Sub for $ty {
            type Output = $ty;
            fn sub(self, rhs: Self) -> $ty {
                &self - &rhs
            }
        }
    };
}
