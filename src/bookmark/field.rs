/// A builder slot: the value plus whether a caller explicitly assigned it.
///
/// `is_set` is tracked independently of `value`, so a field explicitly set to
/// its zero value (`""`, `0.0`) is distinguishable from one never touched.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Field<T> {
    value: T,
    is_set: bool,
}

impl<T> Field<T> {
    /// Field holding `value` and already marked as set
    pub fn explicit(value: T) -> Self {
        Self {
            value,
            is_set: true,
        }
    }

    /// Store `value` and mark the field as set
    pub fn set(&mut self, value: T) {
        self.value = value;
        self.is_set = true;
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    pub fn is_set(&self) -> bool {
        self.is_set
    }
}

impl<T: Default> Field<T> {
    /// Drop any assigned value and clear the set flag
    pub fn reset(&mut self) {
        self.value = T::default();
        self.is_set = false;
    }
}

impl<T: Clone> Field<T> {
    /// The assigned value if set, otherwise `fallback`
    pub fn merged(&self, fallback: &T) -> T {
        if self.is_set {
            self.value.clone()
        } else {
            fallback.clone()
        }
    }
}

impl<T> Field<Option<T>> {
    /// Assign an optional value. `None` is the absence marker: it leaves the
    /// field unset rather than explicitly empty.
    pub fn set_present(&mut self, value: Option<T>) {
        self.is_set = value.is_some();
        self.value = value;
    }
}

#[cfg(test)]
mod field_tests {
    use super::*;

    #[test]
    fn test_default_is_unset() {
        let field: Field<String> = Field::default();
        assert!(!field.is_set());
        assert_eq!(field.get(), "");
    }

    #[test]
    fn test_zero_value_counts_as_set() {
        let mut field: Field<f64> = Field::default();
        field.set(0.0);
        assert!(field.is_set());
        assert_eq!(*field.get(), 0.0);
    }

    #[test]
    fn test_none_leaves_optional_unset() {
        let mut field: Field<Option<u32>> = Field::default();
        field.set_present(Some(3));
        assert!(field.is_set());

        field.set_present(None);
        assert!(!field.is_set());
        assert_eq!(*field.get(), None);
    }

    #[test]
    fn test_merged_prefers_set_value() {
        let mut field: Field<String> = Field::default();
        assert_eq!(field.merged(&"target".to_string()), "target");

        field.set(String::new());
        assert_eq!(field.merged(&"target".to_string()), "");

        field.reset();
        assert!(!field.is_set());
        assert_eq!(field.merged(&"target".to_string()), "target");
    }
}
