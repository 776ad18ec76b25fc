pub(crate) mod show;

pub(crate) use show::command_show;
