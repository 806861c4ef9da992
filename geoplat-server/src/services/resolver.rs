use crate::data;
use geoplat_common::{VpnServer, VpnSuggestion};
use std::collections::HashMap;
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

/// Lowercase, accent-free, whitespace-collapsed lookup key.
pub fn normalize_key(value: &str) -> String {
    value
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tier {
    Exact,
    Capital(String),
    Default,
}

#[derive(Debug, Clone)]
pub struct Resolution<'a> {
    pub server: &'a VpnServer,
    pub tier: Tier,
    pub message: String,
}

impl Resolution<'_> {
    pub fn into_suggestion(self) -> VpnSuggestion {
        VpnSuggestion {
            ip: self.server.ip.clone(),
            location: self.server.location(),
            provider: self.server.provider.clone(),
            message: self.message,
        }
    }
}

pub struct LocationResolver {
    servers: Vec<VpnServer>,
    by_city: HashMap<String, usize>,
    default_idx: usize,
}

impl LocationResolver {
    pub fn new(servers: Vec<VpnServer>, default_city: &str) -> anyhow::Result<Self> {
        let mut by_city = HashMap::with_capacity(servers.len());
        for (idx, server) in servers.iter().enumerate() {
            by_city.entry(normalize_key(&server.city)).or_insert(idx);
        }

        let default_idx = *by_city
            .get(&normalize_key(default_city))
            .ok_or_else(|| anyhow::anyhow!("default city {} has no VPN server", default_city))?;

        Ok(Self {
            servers,
            by_city,
            default_idx,
        })
    }

    pub fn brazil() -> anyhow::Result<Self> {
        Self::new(data::vpn_directory(), data::DEFAULT_CITY)
    }

    pub fn servers(&self) -> &[VpnServer] {
        &self.servers
    }

    fn find(&self, city: &str) -> Option<&VpnServer> {
        self.by_city
            .get(&normalize_key(city))
            .map(|&idx| &self.servers[idx])
    }

    /// Exact city first, then the state's capital, then the default city.
    pub fn resolve(&self, state: &str, city: &str) -> Resolution<'_> {
        let state = data::canonical_state(state);
        let city = city.trim();

        if let Some(server) = self.find(city) {
            return Resolution {
                server,
                tier: Tier::Exact,
                message: format!("Server IP in {}, {}", server.city, server.state),
            };
        }

        if let Some(capital) = data::capital_of(&state) {
            if let Some(server) = self.find(capital) {
                return Resolution {
                    server,
                    tier: Tier::Capital(capital.to_string()),
                    message: format!(
                        "No server in {}. Using the capital's server, {}, {}",
                        city, capital, state
                    ),
                };
            }
        }

        let server = &self.servers[self.default_idx];
        Resolution {
            server,
            tier: Tier::Default,
            message: format!(
                "No local server. Using default server in {}, {}",
                server.city, server.state
            ),
        }
    }
}
