//! Fixed reference tables: state codes, capitals, the VPN server directory
//! and a handful of example cities per state.

use geoplat_common::VpnServer;
use lazy_static::lazy_static;
use std::collections::HashMap;

pub const DEFAULT_CITY: &str = "São Paulo";

pub const STATE_CODES: [&str; 27] = [
    "AC", "AL", "AP", "AM", "BA", "CE", "DF", "ES", "GO", "MA", "MT", "MS", "MG", "PA", "PB", "PR",
    "PE", "PI", "RJ", "RN", "RS", "RO", "RR", "SC", "SP", "SE", "TO",
];

pub const STATE_CAPITALS: [(&str, &str); 27] = [
    ("AC", "Rio Branco"),
    ("AL", "Maceió"),
    ("AP", "Macapá"),
    ("AM", "Manaus"),
    ("BA", "Salvador"),
    ("CE", "Fortaleza"),
    ("DF", "Brasília"),
    ("ES", "Vitória"),
    ("GO", "Goiânia"),
    ("MA", "São Luís"),
    ("MT", "Cuiabá"),
    ("MS", "Campo Grande"),
    ("MG", "Belo Horizonte"),
    ("PA", "Belém"),
    ("PB", "João Pessoa"),
    ("PR", "Curitiba"),
    ("PE", "Recife"),
    ("PI", "Teresina"),
    ("RJ", "Rio de Janeiro"),
    ("RN", "Natal"),
    ("RS", "Porto Alegre"),
    ("RO", "Porto Velho"),
    ("RR", "Boa Vista"),
    ("SC", "Florianópolis"),
    ("SP", "São Paulo"),
    ("SE", "Aracaju"),
    ("TO", "Palmas"),
];

pub struct ServerEntry {
    pub city: &'static str,
    pub state: &'static str,
    pub ip: &'static str,
    pub provider: &'static str,
}

const LOCAL: &str = "Provedor Local (Simulado)";

pub const VPN_SERVERS: [ServerEntry; 27] = [
    ServerEntry { city: "São Paulo", state: "SP", ip: "172.67.149.123", provider: "ExemploVPN" },
    ServerEntry { city: "Rio de Janeiro", state: "RJ", ip: "188.114.97.7", provider: "ExemploVPN" },
    ServerEntry { city: "Fortaleza", state: "CE", ip: "162.159.135.234", provider: "SuperVPN" },
    ServerEntry { city: "Rio Branco", state: "AC", ip: "177.128.10.54", provider: LOCAL },
    ServerEntry { city: "Maceió", state: "AL", ip: "189.45.20.112", provider: LOCAL },
    ServerEntry { city: "Macapá", state: "AP", ip: "200.215.30.98", provider: LOCAL },
    ServerEntry { city: "Manaus", state: "AM", ip: "201.55.40.15", provider: LOCAL },
    ServerEntry { city: "Salvador", state: "BA", ip: "177.85.50.201", provider: LOCAL },
    ServerEntry { city: "Brasília", state: "DF", ip: "186.202.60.44", provider: LOCAL },
    ServerEntry { city: "Vitória", state: "ES", ip: "189.125.70.89", provider: LOCAL },
    ServerEntry { city: "Goiânia", state: "GO", ip: "200.188.80.176", provider: LOCAL },
    ServerEntry { city: "São Luís", state: "MA", ip: "177.135.90.231", provider: LOCAL },
    ServerEntry { city: "Cuiabá", state: "MT", ip: "186.225.100.12", provider: LOCAL },
    ServerEntry { city: "Campo Grande", state: "MS", ip: "201.85.110.67", provider: LOCAL },
    ServerEntry { city: "Belo Horizonte", state: "MG", ip: "177.95.120.143", provider: LOCAL },
    ServerEntry { city: "Belém", state: "PA", ip: "189.88.130.22", provider: LOCAL },
    ServerEntry { city: "João Pessoa", state: "PB", ip: "200.222.140.88", provider: LOCAL },
    ServerEntry { city: "Curitiba", state: "PR", ip: "177.105.150.199", provider: LOCAL },
    ServerEntry { city: "Recife", state: "PE", ip: "186.212.160.33", provider: LOCAL },
    ServerEntry { city: "Teresina", state: "PI", ip: "201.65.170.101", provider: LOCAL },
    ServerEntry { city: "Natal", state: "RN", ip: "177.155.180.55", provider: LOCAL },
    ServerEntry { city: "Porto Alegre", state: "RS", ip: "189.65.190.132", provider: LOCAL },
    ServerEntry { city: "Porto Velho", state: "RO", ip: "200.198.200.77", provider: LOCAL },
    ServerEntry { city: "Boa Vista", state: "RR", ip: "177.185.210.118", provider: LOCAL },
    ServerEntry { city: "Florianópolis", state: "SC", ip: "186.235.220.201", provider: LOCAL },
    ServerEntry { city: "Aracaju", state: "SE", ip: "201.95.230.15", provider: LOCAL },
    ServerEntry { city: "Palmas", state: "TO", ip: "177.195.240.92", provider: LOCAL },
];

pub const EXAMPLE_CITIES: [(&str, &[&str]); 27] = [
    ("AC", &["Rio Branco", "Cruzeiro do Sul", "Sena Madureira", "Tarauacá"]),
    ("AL", &["Maceió", "Arapiraca", "Rio Largo", "Palmeira dos Índios"]),
    ("AP", &["Macapá", "Santana", "Laranjal do Jari", "Oiapoque"]),
    ("AM", &["Manaus", "Parintins", "Itacoatiara", "Manacapuru"]),
    ("BA", &["Salvador", "Feira de Santana", "Vitória da Conquista", "Ilhéus"]),
    ("CE", &["Fortaleza", "Caucaia", "Juazeiro do Norte", "Sobral"]),
    ("DF", &["Brasília", "Taguatinga", "Ceilândia", "Gama"]),
    ("ES", &["Vitória", "Vila Velha", "Serra", "Cariacica"]),
    ("GO", &["Goiânia", "Aparecida de Goiânia", "Anápolis", "Rio Verde"]),
    ("MA", &["São Luís", "Imperatriz", "Caxias", "Timon"]),
    ("MT", &["Cuiabá", "Várzea Grande", "Rondonópolis", "Sinop"]),
    ("MS", &["Campo Grande", "Dourados", "Três Lagoas", "Corumbá"]),
    ("MG", &["Belo Horizonte", "Uberlândia", "Contagem", "Juiz de Fora"]),
    ("PA", &["Belém", "Ananindeua", "Santarém", "Marabá"]),
    ("PB", &["João Pessoa", "Campina Grande", "Santa Rita", "Patos"]),
    ("PR", &["Curitiba", "Londrina", "Maringá", "Ponta Grossa"]),
    ("PE", &["Recife", "Jaboatão dos Guararapes", "Olinda", "Caruaru"]),
    ("PI", &["Teresina", "Parnaíba", "Picos", "Floriano"]),
    ("RJ", &["Rio de Janeiro", "Niterói", "São Gonçalo", "Duque de Caxias"]),
    ("RN", &["Natal", "Mossoró", "Parnamirim", "Caicó"]),
    ("RS", &["Porto Alegre", "Caxias do Sul", "Pelotas", "Canoas"]),
    ("RO", &["Porto Velho", "Ji-Paraná", "Ariquemes", "Vilhena"]),
    ("RR", &["Boa Vista", "Rorainópolis", "Caracaraí", "Pacaraima"]),
    ("SC", &["Florianópolis", "Joinville", "Blumenau", "Chapecó"]),
    ("SP", &["São Paulo", "Campinas", "Santos", "Ribeirão Preto"]),
    ("SE", &["Aracaju", "Nossa Senhora do Socorro", "Lagarto", "Itabaiana"]),
    ("TO", &["Palmas", "Araguaína", "Gurupi", "Porto Nacional"]),
];

lazy_static! {
    static ref CAPITALS: HashMap<&'static str, &'static str> =
        STATE_CAPITALS.iter().copied().collect();
    static ref CITIES_BY_STATE: HashMap<&'static str, &'static [&'static str]> =
        EXAMPLE_CITIES.iter().copied().collect();
}

/// Canonical (uppercase, trimmed) form of a state code.
pub fn canonical_state(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

pub fn is_state_code(code: &str) -> bool {
    CAPITALS.contains_key(canonical_state(code).as_str())
}

pub fn capital_of(code: &str) -> Option<&'static str> {
    CAPITALS.get(canonical_state(code).as_str()).copied()
}

pub fn example_cities(code: &str) -> &'static [&'static str] {
    CITIES_BY_STATE
        .get(canonical_state(code).as_str())
        .copied()
        .unwrap_or(&[])
}

pub fn vpn_directory() -> Vec<VpnServer> {
    VPN_SERVERS
        .iter()
        .map(|e| VpnServer {
            city: e.city.to_string(),
            state: e.state.to_string(),
            ip: e.ip.to_string(),
            provider: e.provider.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    #[test]
    fn test_tables_cover_every_state() {
        for code in STATE_CODES {
            assert!(capital_of(code).is_some(), "missing capital for {}", code);
            assert!(!example_cities(code).is_empty(), "no cities for {}", code);
            assert!(
                VPN_SERVERS.iter().any(|s| s.state == code),
                "no server for {}",
                code
            );
        }
    }

    #[test]
    fn test_every_capital_has_a_server() {
        for (code, capital) in STATE_CAPITALS {
            assert!(VPN_SERVERS
                .iter()
                .any(|s| s.city == capital && s.state == code));
        }
    }

    #[test]
    fn test_server_ips_are_ipv4() {
        for server in &VPN_SERVERS {
            assert!(server.ip.parse::<Ipv4Addr>().is_ok(), "bad ip {}", server.ip);
        }
    }

    #[test]
    fn test_state_lookup_is_case_insensitive() {
        assert_eq!(capital_of(" ac "), Some("Rio Branco"));
        assert!(is_state_code("sp"));
        assert!(!is_state_code("XX"));
        assert!(example_cities("XX").is_empty());
    }
}
