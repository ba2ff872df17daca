/// Static registry of partners sponsoring extra reward attribution for
/// contributions to their repositories. An entry may list either full
/// `org/repo` identifiers or a bare `org`, which qualifies every repository
/// under that organization.
#[derive(Debug, Clone, Copy)]
pub struct BonusPartner {
    pub key: &'static str,
    pub name: &'static str,
    pub icon: &'static str,
    pub repos: &'static [&'static str],
}

pub const BONUS_PARTNERS: &[BonusPartner] = &[
    BonusPartner {
        key: "optimism",
        name: "Optimism",
        icon: "https://cryptologos.cc/logos/optimism-ethereum-op-logo.png",
        repos: &["optimism-labs/optimism"],
    },
    BonusPartner {
        key: "polygon",
        name: "Polygon",
        icon: "https://cryptologos.cc/logos/polygon-matic-logo.png",
        repos: &["polygon-edge/polygon-edge"],
    },
    BonusPartner {
        key: "celo",
        name: "Celo",
        icon: "https://cryptologos.cc/logos/celo-celo-logo.png",
        repos: &[
            "mento-protocol",
            "celo-org/celo-composer",
            "valora-inc/hooks",
            "Glo-Foundation/glo-wallet",
            "Ubeswap/ubeswap-interface-v3",
            "gitcoinco/grants-stack",
            "GoodDollar/GoodWeb3-Mono",
            "GoodDollar/GoodCollective",
        ],
    },
];

/// Matches a `"org/repo"` identifier against the registry: exact repository
/// match first, then the organization alone. Returns the first matching
/// partner key in registry order.
pub fn match_partner(repo: &str) -> Option<&'static str> {
    match_partner_in(BONUS_PARTNERS, repo)
}

fn match_partner_in(registry: &'static [BonusPartner], repo: &str) -> Option<&'static str> {
    let org = repo.split('/').next().unwrap_or(repo);
    registry
        .iter()
        .find(|partner| partner.repos.contains(&repo) || partner.repos.contains(&org))
        .map(|partner| partner.key)
}

pub fn partner_by_key(key: &str) -> Option<&'static BonusPartner> {
    BONUS_PARTNERS.iter().find(|partner| partner.key == key)
}
