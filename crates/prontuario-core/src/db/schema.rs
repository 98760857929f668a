//! SQLite schema definition.

/// Complete database schema for the clinic store.
pub const SCHEMA: &str = r#"
-- ============================================================================
-- Visit Records (prontuarios)
-- ============================================================================

CREATE TABLE IF NOT EXISTS prontuarios (
    id TEXT PRIMARY KEY,
    paciente TEXT NOT NULL DEFAULT '',
    data TEXT,                                   -- DD/MM/YYYY
    data_iso TEXT,                               -- YYYY-MM-DD, NULL when data is malformed
    inicio TEXT,
    fim TEXT,
    valor TEXT,                                  -- R$ D,DD
    tipo_atendimento TEXT CHECK (
        tipo_atendimento IS NULL
        OR tipo_atendimento IN ('Online', 'Presencial', 'Particular', 'Plano')
    ),
    status TEXT CHECK (status IS NULL OR status IN ('Em andamento', 'Encerrado')),
    evolucao TEXT,
    cpf TEXT,
    data_nascimento TEXT,
    idade TEXT,
    endereco TEXT,
    email TEXT,
    celular TEXT,
    criado_em TEXT,                              -- RFC 3339
    atualizado_em TEXT
);

CREATE INDEX IF NOT EXISTS idx_prontuarios_paciente ON prontuarios(paciente);
CREATE INDEX IF NOT EXISTS idx_prontuarios_data_iso ON prontuarios(data_iso);

-- ============================================================================
-- Appointments (agendamentos)
-- ============================================================================

CREATE TABLE IF NOT EXISTS agendamentos (
    id TEXT PRIMARY KEY,
    data TEXT NOT NULL,                          -- YYYY-MM-DD
    inicio TEXT NOT NULL,
    fim TEXT NOT NULL,
    paciente TEXT NOT NULL,
    local TEXT NOT NULL,
    criado_em TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_agendamentos_data ON agendamentos(data);
"#;
