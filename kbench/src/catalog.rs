use std::error::Error;
use std::fmt::{Display, Formatter};

use crate::measurement::CountsMode;

/// Error occurring during building a method catalog.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum CatalogError {
    /// A method was declared with an empty file-type list.
    EmptyFileTypes(String),
    /// The same method name was declared twice.
    DuplicateMethod(String),
}

impl Display for CatalogError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::EmptyFileTypes(method) => {
                write!(f, "Method `{}` declares no output file types", method)
            }
            CatalogError::DuplicateMethod(method) => {
                write!(f, "Method `{}` is declared more than once", method)
            }
        }
    }
}

impl Error for CatalogError {}

/// The result of a catalog-building operation.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Static description of one benchmarked method: its name, the ordered list
/// of output file types it produces, and whether it has a counts variant.
///
/// Instances only exist through [`MethodDescriptor::new`], so `file_types`
/// is always non-empty.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct MethodDescriptor {
    name: String,
    file_types: Vec<String>,
    supports_counts: bool,
}

impl MethodDescriptor {
    /// Creates a new `MethodDescriptor`.
    ///
    /// # Examples
    /// ```
    /// use kbench::catalog::MethodDescriptor;
    ///
    /// let ust = MethodDescriptor::new("ust", ["fasta", "counts"], true).unwrap();
    /// assert_eq!(ust.name(), "ust");
    /// assert_eq!(ust.file_types(), ["fasta", "counts"]);
    /// ```
    ///
    /// # Errors
    /// Returns [`CatalogError::EmptyFileTypes`] if `file_types` is empty.
    pub fn new<N, F, T>(name: N, file_types: F, supports_counts: bool) -> CatalogResult<Self>
    where
        N: Into<String>,
        F: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let name = name.into();
        let file_types: Vec<String> = file_types.into_iter().map(Into::into).collect();

        if file_types.is_empty() {
            return Err(CatalogError::EmptyFileTypes(name));
        }

        Ok(Self {
            name,
            file_types,
            supports_counts,
        })
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns all output file types, in the order the method emits them.
    #[inline]
    #[must_use]
    pub fn file_types(&self) -> &[String] {
        &self.file_types
    }

    #[inline]
    #[must_use]
    pub fn supports_counts(&self) -> bool {
        self.supports_counts
    }

    /// Returns the file types charged to this method in the given mode.
    ///
    /// The counts-bearing file is emitted only when counts are requested, so
    /// a `NoCounts` pass charges the first file type alone; charging the
    /// rest would double-count the counts artifact.
    ///
    /// # Examples
    /// ```
    /// use kbench::catalog::MethodDescriptor;
    /// use kbench::measurement::CountsMode;
    ///
    /// let ust = MethodDescriptor::new("ust", ["fasta", "counts"], true).unwrap();
    /// assert_eq!(ust.file_types_for(CountsMode::Counts), ["fasta", "counts"]);
    /// assert_eq!(ust.file_types_for(CountsMode::NoCounts), ["fasta"]);
    /// ```
    #[must_use]
    pub fn file_types_for(&self, mode: CountsMode) -> &[String] {
        match mode {
            CountsMode::Counts => &self.file_types,
            CountsMode::NoCounts => &self.file_types[..1],
        }
    }

    /// Returns `true` if the method can be benchmarked in the given mode.
    #[must_use]
    pub fn supports(&self, mode: CountsMode) -> bool {
        match mode {
            CountsMode::Counts => self.supports_counts,
            CountsMode::NoCounts => true,
        }
    }
}

/// An immutable, ordered collection of [`MethodDescriptor`]s.
///
/// The catalog is configuration data: it is built once and passed explicitly
/// to every consumer. Method order is significant — all per-method report
/// vectors use catalog order.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct MethodCatalog {
    methods: Vec<MethodDescriptor>,
}

impl MethodCatalog {
    /// Creates a new `MethodCatalog` from a list of descriptors.
    ///
    /// # Errors
    /// Returns [`CatalogError::DuplicateMethod`] if two descriptors share a
    /// name.
    pub fn new<I>(methods: I) -> CatalogResult<Self>
    where
        I: IntoIterator<Item = MethodDescriptor>,
    {
        let methods: Vec<MethodDescriptor> = methods.into_iter().collect();

        for (i, method) in methods.iter().enumerate() {
            if methods[..i].iter().any(|m| m.name() == method.name()) {
                return Err(CatalogError::DuplicateMethod(method.name().to_owned()));
            }
        }

        Ok(Self { methods })
    }

    /// Returns all descriptors, in catalog order.
    #[inline]
    #[must_use]
    pub fn methods(&self) -> &[MethodDescriptor] {
        &self.methods
    }

    /// Returns the descriptors supporting the given mode, in catalog order.
    pub fn methods_for(&self, mode: CountsMode) -> impl Iterator<Item = &MethodDescriptor> {
        self.methods.iter().filter(move |m| m.supports(mode))
    }

    /// Returns the names of the methods supporting the given mode.
    #[must_use]
    pub fn method_names_for(&self, mode: CountsMode) -> Vec<String> {
        self.methods_for(mode)
            .map(|m| m.name().to_owned())
            .collect()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&MethodDescriptor> {
        self.methods.iter().find(|m| m.name() == name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.methods.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}
