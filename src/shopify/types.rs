//! Tipos de resposta do endpoint de criação de coleções da Admin API.
//!
//! A API devolve a coleção criada embrulhada na mesma chave usada na
//! requisição (`custom_collection` ou `smart_collection`). Campos que não
//! interessam ao log são ignorados na desserialização.

use serde::Deserialize;

use crate::collection::CollectionType;

/// A coleção recém-criada, reduzida aos campos que o log registra.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedCollection {
    /// Identificador numérico atribuído pela plataforma.
    pub id: u64,
    /// Handle (slug) da coleção, gerado a partir do título quando omitido.
    pub handle: String,
}

/// Envelope de resposta: exatamente uma das chaves vem preenchida.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CollectionEnvelope {
    #[serde(default)]
    pub custom_collection: Option<CreatedCollection>,
    #[serde(default)]
    pub smart_collection: Option<CreatedCollection>,
}

impl CollectionEnvelope {
    /// A coleção criada e seu tipo, ou `None` para respostas inesperadas.
    pub fn created(&self) -> Option<(CollectionType, &CreatedCollection)> {
        if let Some(c) = &self.custom_collection {
            return Some((CollectionType::Custom, c));
        }
        if let Some(c) = &self.smart_collection {
            return Some((CollectionType::Smart, c));
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_deserializes_from_api_format() {
        let json = r#"{
            "custom_collection": {
                "id": 1063001322,
                "handle": "ipods",
                "title": "IPods",
                "published_scope": "web"
            }
        }"#;
        let envelope: CollectionEnvelope = serde_json::from_str(json).unwrap();
        let (kind, created) = envelope.created().unwrap();
        assert_eq!(kind, CollectionType::Custom);
        assert_eq!(created.id, 1063001322);
        assert_eq!(created.handle, "ipods");
    }

    #[test]
    fn smart_envelope_resolves_smart_kind() {
        let json = r#"{"smart_collection": {"id": 7, "handle": "on-sale"}}"#;
        let envelope: CollectionEnvelope = serde_json::from_str(json).unwrap();
        let (kind, created) = envelope.created().unwrap();
        assert_eq!(kind, CollectionType::Smart);
        assert_eq!(created.handle, "on-sale");
    }

    #[test]
    fn unexpected_body_yields_none() {
        let envelope: CollectionEnvelope =
            serde_json::from_str(r#"{"errors": "nope"}"#).unwrap();
        assert!(envelope.created().is_none());
    }
}
