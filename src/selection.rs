use crate::schema::sales;
#[cfg(feature = "python")]
use pyo3::prelude::*;

/// Per-dimension filter selection for one pipeline run.
///
/// An empty set on a dimension means "no constraint", never "value is
/// empty". Users build these from Python per interaction; the Rust pipeline
/// executes them and throws them away.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "python", pyclass(name = "Selection"))]
pub struct Selection {
    pub countries: Vec<String>,
    pub clients: Vec<String>,
    pub products: Vec<String>,
}

impl Selection {
    /// A selection with no constraint on any dimension.
    pub fn unconstrained() -> Self {
        Self::default()
    }

    pub fn is_unconstrained(&self) -> bool {
        self.countries.is_empty() && self.clients.is_empty() && self.products.is_empty()
    }

    /// Non-empty constraints, in cascade order [country, client, product].
    pub fn constraints(&self) -> Vec<(&'static str, &[String])> {
        let dims: [(&'static str, &[String]); 3] = [
            (sales::COUNTRY, &self.countries),
            (sales::CLIENT, &self.clients),
            (sales::PRODUCT, &self.products),
        ];
        dims.into_iter().filter(|(_, values)| !values.is_empty()).collect()
    }
}

#[cfg(feature = "python")]
#[pymethods]
impl Selection {
    #[new]
    #[pyo3(signature = (countries=None, clients=None, products=None))]
    fn new(
        countries: Option<Vec<String>>,
        clients: Option<Vec<String>>,
        products: Option<Vec<String>>,
    ) -> Self {
        Self {
            countries: countries.unwrap_or_default(),
            clients: clients.unwrap_or_default(),
            products: products.unwrap_or_default(),
        }
    }

    /// True when no dimension carries a constraint.
    #[pyo3(name = "is_unconstrained")]
    fn py_is_unconstrained(&self) -> bool {
        self.is_unconstrained()
    }

    fn __repr__(&self) -> String {
        format!(
            "Selection(countries={:?}, clients={:?}, products={:?})",
            self.countries, self.clients, self.products
        )
    }
}
