//! Fixed answer texts. Only the trailing reference line is data driven.

/// Marker used wherever a value is not available (authors, year, title)
pub const NOT_AVAILABLE: &str = "s/d";

pub const REFERENCES_PREFIX: &str = "Referências: ";

pub const NO_REFERENCES: &str = "nenhuma";

pub const EMPTY_QUESTION_ANSWER: &str = "Escreva uma pergunta para eu pesquisar.";

pub const UPSTREAM_UNAVAILABLE_ANSWER: &str =
    "Não consegui acessar a base de artigos agora. Tente novamente em instantes.";

pub const INTERNAL_ERROR_ANSWER: &str =
    "Algo deu errado ao processar sua pergunta. Tente novamente.";

pub const NO_EVIDENCE_ANSWER: &str = "Não encontrei estudos com resumo disponível que batam bem com sua pergunta agora.

Tente reformular com:
• idade
• objetivo (ex.: interagir com colegas, comunicação, autonomia)
• contexto (educação infantil, sala regular, TEA/DI etc.)

Referências: nenhuma";

const ADVICE: &str = "Com base nos estudos recuperados, aqui vão sugestões práticas (educação infantil), organizadas para você aplicar em sala:

1) Defina um objetivo social observável
   • Ex.: “iniciar interação 2x por atividade”, “esperar a vez”, “pedir para entrar na brincadeira”.

2) Estruture interações em pequenos grupos
   • Duplas ou trios funcionam melhor do que grupos grandes.
   • Combine papéis simples (quem entrega, quem escolhe, quem mostra).

3) Use mediação entre pares
   • Escolha 1 colega “parceiro” por vez, com instruções claras do que fazer (convidar, oferecer, esperar resposta).
   • Troque os pares ao longo da semana para generalizar.

4) Rotinas e pistas visuais
   • Regras curtas e visuais: “minha vez / sua vez”, “perguntar / responder”, “esperar”.
   • Sequência da atividade em 3 passos (cartões ou quadro).

5) Reforço e feedback imediato
   • Reforce o comportamento-alvo (não só “ficar quieto”): elogio específico + consequência positiva curta.

6) Generalize em diferentes momentos da rotina
   • Faça a mesma habilidade aparecer na roda, na brincadeira livre e na atividade dirigida.

Se você me responder (idade, diagnóstico se houver, nível de fala/comunicação e em qual momento a interação é mais difícil), eu adapto essas etapas para um plano de atividade mais específico.";

/// Advisory answer followed by the reference line, e.g. `Referências: REF-1, REF-2`
pub fn render_answer<S: AsRef<str>>(labels: &[S]) -> String {
    let line = if labels.is_empty() {
        NO_REFERENCES.to_string()
    } else {
        labels
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join(", ")
    };

    format!("{ADVICE}\n\n{REFERENCES_PREFIX}{line}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_line_is_last() {
        let answer = render_answer(&["REF-1", "REF-2"]);
        assert!(answer.starts_with("Com base nos estudos recuperados"));
        assert_eq!(answer.lines().last(), Some("Referências: REF-1, REF-2"));
    }

    #[test]
    fn test_advice_has_no_labels() {
        assert!(!ADVICE.contains("REF-"));
        assert!(!NO_EVIDENCE_ANSWER.contains("REF-"));
        assert!(NO_EVIDENCE_ANSWER.ends_with("Referências: nenhuma"));
    }
}
