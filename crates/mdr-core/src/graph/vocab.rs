//! Vocabulary IRIs for item graphs
//!
//! Each module exposes its namespace as `NS` and one constant per class or
//! predicate holding the full IRI.

macro_rules! vocabulary {
    ($(#[$meta:meta])* $module:ident = $ns:literal { $($name:ident => $local:literal),* $(,)? }) => {
        $(#[$meta])*
        pub mod $module {
            pub const NS: &str = $ns;
            $(pub const $name: &str = concat!($ns, $local);)*
        }
    };
}

vocabulary!(rdf = "http://www.w3.org/1999/02/22-rdf-syntax-ns#" {
    TYPE => "type",
});

vocabulary!(rdfs = "http://www.w3.org/2000/01/rdf-schema#" {
    LABEL => "label",
});

vocabulary!(
    /// ISO 11179 identification: scoped identifiers
    iso_i = "http://www.assero.co.uk/ISO11179Identification#" {
        SCOPED_IDENTIFIER => "ScopedIdentifier",
        HAS_IDENTIFIER => "hasIdentifier",
        IDENTIFIER => "identifier",
        VERSION => "version",
        VERSION_LABEL => "versionLabel",
        SCOPE_ID => "scopeId",
        SCOPE_SHORT_NAME => "scopeShortName",
        SCOPE_NAME => "scopeName",
    }
);

vocabulary!(
    /// ISO 11179 registration: registration state and authority
    iso_r = "http://www.assero.co.uk/ISO11179Registration#" {
        REGISTRATION_STATE => "RegistrationState",
        HAS_STATE => "hasState",
        REGISTRATION_STATUS => "registrationStatus",
        ADMINISTRATIVE_NOTE => "administrativeNote",
        UNRESOLVED_ISSUE => "unresolvedIssue",
        EFFECTIVE_DATE => "effectiveDate",
        UNTIL_DATE => "untilDate",
        CURRENT => "current",
        AUTHORITY_NUMBER => "authorityNumber",
        AUTHORITY_SCHEME => "authorityScheme",
        AUTHORITY_SCOPE_ID => "authorityScopeId",
        AUTHORITY_SCOPE_SHORT_NAME => "authorityScopeShortName",
        AUTHORITY_SCOPE_NAME => "authorityScopeName",
    }
);

vocabulary!(
    /// ISO 11179 types: administered item properties
    iso_t = "http://www.assero.co.uk/ISO11179Types#" {
        ORIGIN => "origin",
        CHANGE_DESCRIPTION => "changeDescription",
        EXPLANATORY_COMMENT => "explanatoryComment",
        CREATION_DATE => "creationDate",
        LAST_CHANGE_DATE => "lastChangeDate",
        BRANCHED_FROM => "branchedFrom",
    }
);

vocabulary!(
    /// Business forms
    bf = "http://www.assero.co.uk/BusinessForm#" {
        FORM => "Form",
        NORMAL_GROUP => "NormalGroup",
        QUESTION => "Question",
        PLACEHOLDER => "Placeholder",
        TEXT_LABEL => "TextLabel",
        COMPLETION => "completion",
        NOTE => "note",
        HAS_GROUP => "hasGroup",
        HAS_SUB_GROUP => "hasSubGroup",
        HAS_ITEM => "hasItem",
        ORDINAL => "ordinal",
        OPTIONAL => "optional",
        REPEATING => "repeating",
        QUESTION_TEXT => "questionText",
        DATATYPE => "datatype",
        FORMAT => "format",
        MAPPING => "mapping",
        FREE_TEXT => "freeText",
        LABEL_TEXT => "labelText",
        HAS_THESAURUS_CONCEPT => "hasThesaurusConcept",
    }
);

vocabulary!(
    /// Operational references to other managed items
    bo = "http://www.assero.co.uk/BusinessOperational#" {
        TC_REFERENCE => "TcReference",
        BCT_REFERENCE => "BctReference",
        HAS_THESAURUS_CONCEPT => "hasThesaurusConcept",
        HAS_TEMPLATE => "hasTemplate",
        ENABLED => "enabled",
        OPTIONAL => "optional",
        ORDINAL => "ordinal",
        LOCAL_LABEL => "localLabel",
    }
);

vocabulary!(
    /// Biomedical concepts
    cbc = "http://www.assero.co.uk/CDISCBiomedicalConcept#" {
        BC_INSTANCE => "BiomedicalConceptInstance",
        BC_TEMPLATE => "BiomedicalConceptTemplate",
        PROPERTY => "Property",
        BASED_ON_TEMPLATE => "basedOnTemplate",
        HAS_PROPERTY => "hasProperty",
        ALIAS => "alias",
        ORDINAL => "ordinal",
        QUESTION_TEXT => "questionText",
        PROMPT_TEXT => "promptText",
        ENABLED => "enabled",
        COLLECT => "collect",
        FORMAT => "format",
        SIMPLE_DATATYPE => "simpleDatatype",
        BRIDG_PATH => "bridgPath",
        HAS_THESAURUS_CONCEPT => "hasThesaurusConcept",
    }
);

vocabulary!(
    /// ISO 25964 thesauri and their concepts
    iso25964 = "http://www.assero.co.uk/ISO25964#" {
        THESAURUS => "Thesaurus",
        THESAURUS_CONCEPT => "ThesaurusConcept",
        IDENTIFIER => "identifier",
        NOTATION => "notation",
        PREFERRED_TERM => "preferredTerm",
        SYNONYM => "synonym",
        DEFINITION => "definition",
    }
);
