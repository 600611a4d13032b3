//! # Headers HTTP
//! src/http/headers.rs
//!
//! Multi-mapa ordenado de headers. A diferencia de un `HashMap`, conserva:
//!
//! - el orden en que llegaron los headers,
//! - los nombres duplicados como entradas separadas,
//! - las mayúsculas/minúsculas del nombre tal como las mandó el cliente.
//!
//! La búsqueda por nombre sí es case-insensitive, como manda el protocolo.

/// Multi-mapa ordenado de headers HTTP
///
/// # Ejemplo
/// ```
/// use file_server::http::Headers;
///
/// let lines = vec![
///     "Host: localhost:8080".to_string(),
///     "Accept: text/html".to_string(),
///     "Accept: application/json".to_string(),
/// ];
/// let headers = Headers::parse(&lines);
///
/// assert_eq!(headers.get("host"), Some("localhost:8080"));
/// assert_eq!(headers.get_all("Accept").len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    /// Crea un multi-mapa vacío
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Parsea un bloque de headers ya separado en líneas
    ///
    /// El parsing es tolerante:
    /// - cada línea es `Nombre: valor`,
    /// - una línea que empieza con espacio o tab continúa el valor anterior
    ///   (unfolding con un espacio),
    /// - las líneas sin `:` se ignoran.
    pub fn parse(lines: &[String]) -> Headers {
        let mut headers = Headers::new();

        for raw in lines {
            let line = raw.trim_end_matches(&['\r', '\n'][..]);
            if line.is_empty() {
                continue;
            }

            // Continuación del header anterior (obs-fold)
            if line.starts_with(' ') || line.starts_with('\t') {
                if let Some((_, value)) = headers.entries.last_mut() {
                    value.push(' ');
                    value.push_str(line.trim());
                }
                continue;
            }

            if let Some(colon) = line.find(':') {
                let name = line[..colon].trim().to_string();
                let value = line[colon + 1..].trim().to_string();
                headers.append(name, value);
            }
        }

        headers
    }

    /// Agrega una entrada al final, sin tocar las existentes
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.push((name.into(), value.into()));
    }

    /// Busca el primer valor de un header (case-insensitive en el nombre)
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Busca todos los valores de un header, en orden de llegada
    pub fn get_all(&self, name: &str) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// Itera sobre los pares (nombre, valor) en orden de llegada
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Cantidad de entradas
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Indica si no hay ninguna entrada
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
