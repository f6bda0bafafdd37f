//! Outreach sequence catalog.
//!
//! A sequence is a named, ordered set of outreach steps tied to a trigger
//! type. The catalog is static configuration: the built-in sequences match
//! production behaviour, and a clinic can swap in its own catalog from a
//! YAML document without a code change.

use crate::error::{EngageError, EngageResult};
use crate::ports::channel::Channel;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

/// Event that starts an outreach sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerType {
    PostTreatment,
    Reactivation,
    Preventive,
    Loyalty,
    Recovery,
}

impl TriggerType {
    /// Every trigger the built-in catalog covers.
    pub const ALL: [TriggerType; 5] = [
        TriggerType::PostTreatment,
        TriggerType::Reactivation,
        TriggerType::Preventive,
        TriggerType::Loyalty,
        TriggerType::Recovery,
    ];

    /// Wire representation of the trigger.
    pub fn as_str(&self) -> &'static str {
        match self {
            TriggerType::PostTreatment => "post_treatment",
            TriggerType::Reactivation => "reactivation",
            TriggerType::Preventive => "preventive",
            TriggerType::Loyalty => "loyalty",
            TriggerType::Recovery => "recovery",
        }
    }

    /// Parses the wire representation.
    ///
    /// Boundary layers map `None` to `EngageError::SequenceNotFound` so an
    /// unknown trigger string fails before any dispatch work starts.
    pub fn parse(input: &str) -> Option<Self> {
        match input {
            "post_treatment" => Some(TriggerType::PostTreatment),
            "reactivation" => Some(TriggerType::Reactivation),
            "preventive" => Some(TriggerType::Preventive),
            "loyalty" => Some(TriggerType::Loyalty),
            "recovery" => Some(TriggerType::Recovery),
            _ => None,
        }
    }
}

impl fmt::Display for TriggerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One step of an outreach sequence.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SequenceStep {
    /// 1-based position within the sequence.
    pub order: u32,
    /// Intended delay in days after the sequence starts.
    pub days_after_start: u32,
    pub channel: Channel,
    pub subject: String,
    /// Message body carrying `{placeholder}` tokens.
    pub message_template: String,
    /// Informational guard ("se não houver resposta"); not machine-enforced.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
}

/// A named, ordered outreach sequence for one trigger type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Sequence {
    pub trigger_type: TriggerType,
    pub name: String,
    pub description: String,
    pub steps: Vec<SequenceStep>,
}

impl Sequence {
    /// The opening step, the only one dispatched immediately.
    pub fn first_step(&self) -> Option<&SequenceStep> {
        self.steps.iter().find(|step| step.order == 1)
    }

    /// Steps that represent future-scheduled touches.
    ///
    /// The engine does not schedule these yet; this query is the extension
    /// point a durable step scheduler would consume.
    pub fn future_steps(&self) -> impl Iterator<Item = &SequenceStep> {
        self.steps.iter().filter(|step| step.order > 1)
    }

    fn validate(&self) -> EngageResult<()> {
        match self.steps.first() {
            None => {
                return Err(EngageError::InvalidConfig(format!(
                    "sequence '{}' has no steps",
                    self.name
                )))
            }
            Some(first) if first.order != 1 => {
                return Err(EngageError::InvalidConfig(format!(
                    "sequence '{}' must start at step order 1, got {}",
                    self.name, first.order
                )))
            }
            Some(_) => {}
        }
        for pair in self.steps.windows(2) {
            if pair[1].order <= pair[0].order {
                return Err(EngageError::InvalidConfig(format!(
                    "sequence '{}' step orders must be strictly increasing ({} then {})",
                    self.name, pair[0].order, pair[1].order
                )));
            }
        }
        Ok(())
    }
}

/// Read-only catalog of outreach sequences, keyed by trigger type.
#[derive(Clone, Debug)]
pub struct SequenceLibrary {
    sequences: HashMap<TriggerType, Sequence>,
}

impl Default for SequenceLibrary {
    fn default() -> Self {
        Self::built_in()
    }
}

impl SequenceLibrary {
    /// The built-in production catalog, covering every trigger type.
    pub fn built_in() -> Self {
        // Validated by construction; covered by the catalog tests below.
        Self::from_sequences(built_in_catalog())
            .expect("built-in sequence catalog is structurally valid")
    }

    /// Builds a catalog from explicit sequences, validating each one.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` for structurally invalid sequences or when
    /// two sequences claim the same trigger.
    pub fn from_sequences(sequences: Vec<Sequence>) -> EngageResult<Self> {
        let mut map = HashMap::with_capacity(sequences.len());
        for sequence in sequences {
            sequence.validate()?;
            let trigger = sequence.trigger_type;
            if map.insert(trigger, sequence).is_some() {
                return Err(EngageError::InvalidConfig(format!(
                    "duplicate sequence for trigger '{trigger}'"
                )));
            }
        }
        Ok(Self { sequences: map })
    }

    /// Parses a catalog from a YAML document (a list of sequences).
    ///
    /// # Errors
    ///
    /// Returns `ConfigParse` for malformed YAML, plus everything
    /// [`SequenceLibrary::from_sequences`] can return.
    pub fn from_yaml_str(yaml: &str) -> EngageResult<Self> {
        let sequences: Vec<Sequence> =
            serde_yaml::from_str(yaml).map_err(EngageError::ConfigParse)?;
        Self::from_sequences(sequences)
    }

    /// Reads and parses a catalog file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigRead` if the file cannot be read, plus everything
    /// [`SequenceLibrary::from_yaml_str`] can return.
    pub fn from_path(path: &Path) -> EngageResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(EngageError::ConfigRead)?;
        Self::from_yaml_str(&contents)
    }

    /// Looks up the sequence registered for a trigger.
    ///
    /// # Errors
    ///
    /// Returns `EngageError::SequenceNotFound` if the catalog has no
    /// sequence for `trigger`. Fatal for the caller's operation; nothing is
    /// dispatched.
    pub fn get(&self, trigger: TriggerType) -> EngageResult<&Sequence> {
        self.sequences
            .get(&trigger)
            .ok_or_else(|| EngageError::SequenceNotFound(trigger.to_string()))
    }

    /// Triggers the catalog covers, in no particular order.
    pub fn triggers(&self) -> impl Iterator<Item = TriggerType> + '_ {
        self.sequences.keys().copied()
    }
}

fn step(
    order: u32,
    days_after_start: u32,
    channel: Channel,
    subject: &str,
    message_template: &str,
    condition: Option<&str>,
) -> SequenceStep {
    SequenceStep {
        order,
        days_after_start,
        channel,
        subject: subject.to_owned(),
        message_template: message_template.to_owned(),
        condition: condition.map(str::to_owned),
    }
}

fn built_in_catalog() -> Vec<Sequence> {
    vec![
        Sequence {
            trigger_type: TriggerType::PostTreatment,
            name: "Acompanhamento pós-tratamento".to_owned(),
            description: "Seguimento nos dias seguintes a um tratamento concluído.".to_owned(),
            steps: vec![
                step(
                    1,
                    1,
                    Channel::Email,
                    "Como está a correr a sua recuperação?",
                    "Olá {nome}, esperamos que esteja a recuperar bem. Se notar algum \
                     desconforto, contacte a {clinica} de imediato.",
                    None,
                ),
                step(
                    2,
                    3,
                    Channel::Whatsapp,
                    "",
                    "{nome}, tudo bem com a recuperação? A equipa da {clinica} está \
                     disponível para qualquer dúvida.",
                    Some("se não houver resposta ao email"),
                ),
                step(
                    3,
                    7,
                    Channel::Sms,
                    "",
                    "{nome}, não se esqueça da consulta de revisão. Ligue para a {clinica} \
                     para agendar.",
                    None,
                ),
            ],
        },
        Sequence {
            trigger_type: TriggerType::Reactivation,
            name: "Reativação de pacientes".to_owned(),
            description: "Recupera pacientes sem visitas há vários meses.".to_owned(),
            steps: vec![
                step(
                    1,
                    0,
                    Channel::Email,
                    "Sentimos a sua falta, {nome}",
                    "Olá {nome}, já passou algum tempo desde a sua última visita à \
                     {clinica}. Que tal agendar uma consulta de revisão?",
                    None,
                ),
                step(
                    2,
                    5,
                    Channel::Sms,
                    "",
                    "{nome}, a {clinica} tem horários disponíveis esta semana. Responda \
                     SIM para ser contactado.",
                    Some("se não houver resposta"),
                ),
                step(
                    3,
                    12,
                    Channel::Whatsapp,
                    "",
                    "Olá {nome}! Última chamada: 20% de desconto na próxima consulta na \
                     {clinica}, válido este mês.",
                    Some("se não houver resposta"),
                ),
            ],
        },
        Sequence {
            trigger_type: TriggerType::Preventive,
            name: "Lembrete preventivo".to_owned(),
            description: "Check-up periódico para pacientes em dia.".to_owned(),
            steps: vec![
                step(
                    1,
                    0,
                    Channel::Email,
                    "Está na altura do seu check-up",
                    "Olá {nome}, chegou a altura do seu check-up periódico na {clinica}. \
                     A prevenção é o melhor cuidado.",
                    None,
                ),
                step(
                    2,
                    7,
                    Channel::Sms,
                    "",
                    "{nome}, ainda não agendou o seu check-up na {clinica}. Estamos à sua \
                     espera!",
                    Some("se não agendar"),
                ),
            ],
        },
        Sequence {
            trigger_type: TriggerType::Loyalty,
            name: "Programa de fidelização".to_owned(),
            description: "Agradece e premeia os pacientes mais assíduos.".to_owned(),
            steps: vec![
                step(
                    1,
                    0,
                    Channel::Email,
                    "Obrigado pela sua confiança",
                    "Olá {nome}, obrigado por confiar na {clinica}. Como paciente \
                     frequente, tem acesso prioritário a marcações e condições especiais.",
                    None,
                ),
                step(
                    2,
                    30,
                    Channel::Whatsapp,
                    "",
                    "{nome}, o seu benefício de fidelização na {clinica} continua ativo. \
                     Conte connosco!",
                    None,
                ),
            ],
        },
        Sequence {
            trigger_type: TriggerType::Recovery,
            name: "Recuperação de pacientes perdidos".to_owned(),
            description: "Última tentativa junto de pacientes há muito afastados.".to_owned(),
            steps: vec![
                step(
                    1,
                    0,
                    Channel::Whatsapp,
                    "",
                    "{nome}, há muito que não o vemos na {clinica}. Preparámos uma oferta \
                     especial de regresso: 30% de desconto na próxima consulta.",
                    None,
                ),
                step(
                    2,
                    4,
                    Channel::Sms,
                    "",
                    "{nome}, a oferta de regresso à {clinica} termina em breve. Ligue-nos \
                     para aproveitar.",
                    Some("se não houver resposta"),
                ),
                step(
                    3,
                    10,
                    Channel::Email,
                    "Gostávamos de voltar a cuidar de si",
                    "Olá {nome}, esta é a nossa última mensagem. A porta da {clinica} fica \
                     sempre aberta para si.",
                    None,
                ),
            ],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_built_in_catalog_covers_every_trigger() {
        let library = SequenceLibrary::built_in();
        for trigger in TriggerType::ALL {
            let sequence = library.get(trigger).unwrap();
            assert_eq!(sequence.trigger_type, trigger);
            assert!(!sequence.steps.is_empty());
        }
        assert_eq!(library.triggers().count(), TriggerType::ALL.len());
    }

    #[test]
    fn test_built_in_sequences_start_at_order_one() {
        let library = SequenceLibrary::built_in();
        for trigger in TriggerType::ALL {
            let sequence = library.get(trigger).unwrap();
            assert_eq!(sequence.first_step().unwrap().order, 1);
            for step in sequence.future_steps() {
                assert!(step.order > 1);
            }
        }
    }

    #[test]
    fn test_built_in_templates_carry_recipient_placeholder() {
        let library = SequenceLibrary::built_in();
        for trigger in TriggerType::ALL {
            for step in &library.get(trigger).unwrap().steps {
                assert!(
                    step.message_template.contains("{nome}"),
                    "step {} of '{}' lacks the recipient placeholder",
                    step.order,
                    trigger
                );
            }
        }
    }

    #[test]
    fn test_lookup_of_missing_trigger_fails() {
        let library = SequenceLibrary::from_sequences(built_in_catalog()[..1].to_vec()).unwrap();
        match library.get(TriggerType::Loyalty) {
            Err(EngageError::SequenceNotFound(trigger)) => assert_eq!(trigger, "loyalty"),
            other => panic!("expected SequenceNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_sequence_rejected() {
        let sequence = Sequence {
            trigger_type: TriggerType::Loyalty,
            name: "Vazia".to_owned(),
            description: String::new(),
            steps: Vec::new(),
        };
        assert!(SequenceLibrary::from_sequences(vec![sequence]).is_err());
    }

    #[test]
    fn test_sequence_must_start_at_order_one() {
        let sequence = Sequence {
            trigger_type: TriggerType::Loyalty,
            name: "Desalinhada".to_owned(),
            description: String::new(),
            steps: vec![step(2, 0, Channel::Email, "", "Olá {nome}", None)],
        };
        assert!(SequenceLibrary::from_sequences(vec![sequence]).is_err());
    }

    #[test]
    fn test_step_orders_must_strictly_increase() {
        let sequence = Sequence {
            trigger_type: TriggerType::Loyalty,
            name: "Repetida".to_owned(),
            description: String::new(),
            steps: vec![
                step(1, 0, Channel::Email, "", "Olá {nome}", None),
                step(1, 3, Channel::Sms, "", "Olá {nome}", None),
            ],
        };
        assert!(SequenceLibrary::from_sequences(vec![sequence]).is_err());
    }

    #[test]
    fn test_duplicate_trigger_rejected() {
        let mut sequences = built_in_catalog()[..1].to_vec();
        sequences.push(sequences[0].clone());
        match SequenceLibrary::from_sequences(sequences) {
            Err(EngageError::InvalidConfig(msg)) => assert!(msg.contains("duplicate")),
            other => panic!("expected InvalidConfig, got {other:?}"),
        }
    }

    #[test]
    fn test_catalog_loads_from_yaml() {
        let yaml = r#"
- trigger_type: reactivation
  name: Reativação personalizada
  description: Catálogo de teste
  steps:
    - order: 1
      days_after_start: 0
      channel: email
      subject: "Olá {nome}"
      message_template: "Sentimos a sua falta, {nome}!"
    - order: 2
      days_after_start: 6
      channel: sms
      subject: ""
      message_template: "{nome}, estamos à sua espera."
      condition: "se não houver resposta"
"#;
        let library = SequenceLibrary::from_yaml_str(yaml).unwrap();
        let sequence = library.get(TriggerType::Reactivation).unwrap();
        assert_eq!(sequence.steps.len(), 2);
        assert_eq!(sequence.steps[1].channel, Channel::Sms);
        assert_eq!(
            sequence.steps[1].condition.as_deref(),
            Some("se não houver resposta")
        );
        assert!(library.get(TriggerType::Recovery).is_err());
    }

    #[test]
    fn test_malformed_yaml_rejected() {
        assert!(matches!(
            SequenceLibrary::from_yaml_str("- trigger_type: [nested"),
            Err(EngageError::ConfigParse(_))
        ));
    }

    #[test]
    fn test_trigger_wire_round_trip() {
        for trigger in TriggerType::ALL {
            assert_eq!(TriggerType::parse(trigger.as_str()), Some(trigger));
        }
        assert_eq!(TriggerType::parse("nonexistent_trigger"), None);
        assert_eq!(
            serde_json::to_string(&TriggerType::PostTreatment).unwrap(),
            "\"post_treatment\""
        );
    }
}
