/// Prefix marking a reference to the complement of a domain.
pub const COMPLEMENT_PREFIX: &str = "c.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainInput {
    pub name: String,
    pub sequence: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OligomerInput {
    pub name: String,
    pub domains: Vec<String>,
}

/// A design as produced by a loader, before any indexing or encoding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DesignInput {
    pub fixed_domains: Vec<DomainInput>,
    pub variable_domains: Vec<DomainInput>,
    pub oligomers: Vec<OligomerInput>,
}

impl DesignInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fixed_domain(mut self, name: impl Into<String>, sequence: impl Into<String>) -> Self {
        self.fixed_domains.push(DomainInput {
            name: name.into(),
            sequence: sequence.into(),
        });
        self
    }

    pub fn variable_domain(
        mut self,
        name: impl Into<String>,
        sequence: impl Into<String>,
    ) -> Self {
        self.variable_domains.push(DomainInput {
            name: name.into(),
            sequence: sequence.into(),
        });
        self
    }

    pub fn oligomer<I, S>(mut self, name: impl Into<String>, domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.oligomers.push(OligomerInput {
            name: name.into(),
            domains: domains.into_iter().map(Into::into).collect(),
        });
        self
    }
}

/// A parsed domain reference inside an oligomer definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DomainReference<'a> {
    pub name: &'a str,
    pub complement: bool,
}

impl<'a> DomainReference<'a> {
    pub fn parse(reference: &'a str) -> Self {
        match reference.strip_prefix(COMPLEMENT_PREFIX) {
            Some(name) => Self {
                name,
                complement: true,
            },
            None => Self {
                name: reference,
                complement: false,
            },
        }
    }
}
